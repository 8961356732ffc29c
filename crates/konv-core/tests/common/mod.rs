pub mod convert_server;
