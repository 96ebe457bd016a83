fn main() {
    docs_assistant_lib::run()
}
