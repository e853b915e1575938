//! Common infrastructure shared by the record verifier and the VMC client.

pub mod dns;
pub mod domain;
