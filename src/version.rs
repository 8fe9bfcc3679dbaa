/// Returns the healstat version information.
pub fn healstat_version_info(build_time: Option<&str>) -> String {
    let fallback = "Unknown (env var does not exist when building)";
    format!(
        "\nRelease Version:   {}\
         \nGit Commit Hash:   {}\
         \nUTC Build Time:    {}\
         \nProfile:           {}",
        env!("CARGO_PKG_VERSION"),
        option_env!("HEALSTAT_BUILD_GIT_HASH").unwrap_or(fallback),
        build_time.unwrap_or(fallback),
        option_env!("HEALSTAT_PROFILE").unwrap_or(fallback),
    )
}
