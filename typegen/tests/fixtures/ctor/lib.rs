pub trait Example {
    fn new(id: u8) -> Self;
    fn id(&self) -> u8;
    fn default() -> Self;
}
