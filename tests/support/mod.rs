#![allow(dead_code)]

pub mod scenario;
