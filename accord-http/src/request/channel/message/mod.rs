mod create_message;
mod delete_message;
mod update_message;

pub use self::{
    create_message::CreateMessage, delete_message::DeleteMessage, update_message::UpdateMessage,
};
