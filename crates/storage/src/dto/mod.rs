pub mod arenaclient;
