pub struct Example {
    #[typegen("alias='abc")]
    value: u8,
}
