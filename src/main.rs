fn main() {
    gradle_scrub::cli::run();
}
