#![allow(dead_code)]

pub mod orders_csv;
pub mod supplydash_env;
