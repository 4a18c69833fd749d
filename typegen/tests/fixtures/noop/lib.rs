use crate::context::Context;
use std::error::Error;

pub trait Example {
    fn init(&self, ctx: Context) -> Result<(), Box<dyn Error>>;
    fn reset(&mut self);
}
