// handlers/public/mod.rs - pages and account endpoints that need no session

pub mod accounts;
pub mod pages;
