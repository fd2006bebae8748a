fn main() {
    #[cfg(feature = "csr")]
    portal::start();
}
