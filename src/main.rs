fn main() {
    macrohex::cli::run();
}
