#[macro_use]
mod helpers;
