// Pushtweet: bidirectional relay between a status stream and Pushbullet.
//
// This is the library root. Notes pushed to the relay's Pushbullet address
// are base64-chunked and posted as status updates; inbound statuses that
// decode as base64 payloads are pushed back as notes. Each module covers
// one piece of that loop.

pub mod codec;
pub mod config;
pub mod dedup;
pub mod pushbullet;
pub mod relay;
pub mod retry;
pub mod status;
