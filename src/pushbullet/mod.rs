// Pushbullet API — REST client, wire types, and the websocket event stream.
//
// Each submodule handles one area of the Pushbullet surface the relay uses.

pub mod client;
pub mod stream;
pub mod types;
