pub mod arenaclient;
pub mod rounds;
