pub mod abi;
pub mod call;
pub mod consts;
pub mod error;
pub mod sdk;
pub mod state;
pub mod utils;

pub mod prelude {
    pub use crate::abi::*;
    pub use crate::call::*;
    pub use crate::consts::*;
    pub use crate::error::*;
    pub use crate::sdk::*;
    pub use crate::state::*;
    pub use crate::utils::*;
}
