pub struct Example {
    name: String,
    #[typegen("skip")]
    cache: Vec<u8>,
    ptr: *const String,
}
