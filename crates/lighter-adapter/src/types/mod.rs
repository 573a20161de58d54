/*
[INPUT]:  Serde-typed API schema modules
[OUTPUT]: Public data types for the adapter crate
[POS]:    Data layer - module wiring
[UPDATE]: When API schema changes or new types added
*/

pub mod responses;

pub use responses::{
    AccountsResponse, ApiKeyEntry, ApiKeysResponse, NextNonceResponse, SubAccount, TxResponse,
};
