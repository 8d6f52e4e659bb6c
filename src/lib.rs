//! Query builder core: turns a structured query description into SQL text,
//! a plain-English explanation, a joined preview over sample data, and a
//! compact token for share links.
pub mod codec;
pub mod command;
pub mod console;
pub mod errors;
pub mod schema;
pub mod session;
pub mod sql;
pub mod storage;
pub mod templates;
