mod create_global_command;

pub use self::create_global_command::CreateGlobalCommand;
