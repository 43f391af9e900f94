// handlers/mod.rs - two security tiers
//
// public:    no token (/auth)
// protected: token required, principal available as an extension

pub mod protected;
pub mod public;
