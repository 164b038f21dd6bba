/// Normalize a compose project name the way docker-compose does.
///
/// Non-alphanumeric characters are dropped and the rest lowercased, so
/// `"app-slave"` becomes `"appslave"`.
pub fn compose_project_name(project: &str) -> String {
    project
        .chars()
        .filter(char::is_ascii_alphanumeric)
        .map(|c| c.to_ascii_lowercase())
        .collect()
}

/// Container name compose assigns to the `index`-th (zero-based) replica of a service.
///
/// Format: `<project>_<service>_<index + 1>`.
pub fn container_name(project: &str, service: &str, index: usize) -> String {
    format!("{}_{}_{}", compose_project_name(project), service, index + 1)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{DEFAULT_PROJECT, DEFAULT_SERVICE};

    #[test]
    fn strips_punctuation_and_lowercases() {
        assert_eq!(compose_project_name("app-slave"), "appslave");
        assert_eq!(compose_project_name("My_Project.v2"), "myprojectv2");
    }

    #[test]
    fn replica_numbers_are_one_based() {
        assert_eq!(container_name(DEFAULT_PROJECT, DEFAULT_SERVICE, 0), "appslave_zap_1");
        assert_eq!(container_name(DEFAULT_PROJECT, DEFAULT_SERVICE, 11), "appslave_zap_12");
    }
}
