fn main() -> std::process::ExitCode {
    moodlog_lib::run()
}
