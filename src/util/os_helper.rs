/// Real name of the OS user, or the login name when no real name is set.
/// Used as the default author of new posts and sites.
pub fn get_name() -> String {
    let name = whoami::realname();
    match name.trim() {
        "" => whoami::username(),
        trimmed => trimmed.to_string(),
    }
}
