/*
[INPUT]:  Bitpin REST payload shapes (orders, markets, tokens)
[OUTPUT]: Enums, request builders and response models re-exported flat
[POS]:    Data layer - module wiring
[UPDATE]: When a types submodule is added or removed
*/

pub mod enums;
pub mod models;
pub mod requests;
pub mod responses;

pub use enums::*;
pub use models::*;
pub use requests::*;
pub use responses::*;
