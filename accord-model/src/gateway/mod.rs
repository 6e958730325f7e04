pub mod connection_info;
pub mod payload;

mod close_code;
mod intents;
mod opcode;

pub use self::{
    close_code::{CloseCode, CloseCodeConversionError},
    connection_info::ConnectionInfo,
    intents::Intents,
    opcode::OpCode,
};
