// Status service API — OAuth 1.0a signing, REST client, user stream.
//
// The status service authenticates every call with OAuth 1.0a (consumer
// key/secret plus access token/secret). Each submodule handles one area
// of that surface.

pub mod client;
pub mod oauth;
pub mod stream;
pub mod types;
