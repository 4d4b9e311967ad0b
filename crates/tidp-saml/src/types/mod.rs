//! SAML types: wire constants and per-request input data.

mod assertion_data;
mod certificate;
mod constants;

pub use assertion_data::*;
pub use certificate::*;
pub use constants::*;
