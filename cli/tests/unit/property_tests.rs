//! Property-based tests for GitHub URL rewriting.

#![allow(clippy::expect_used, clippy::unwrap_used)]

use proptest::prelude::*;
use rosdock_cli::domain::GitHubProtocol;
use rosdock_cli::domain::git::{convert_url_protocol, repo_name};

fn github_url() -> impl Strategy<Value = String> {
    let owner = "[a-z][a-z0-9-]{0,15}";
    let repo = "[a-z][a-z0-9_.-]{0,20}";
    (owner, repo, proptest::bool::ANY).prop_map(|(owner, repo, ssh)| {
        if ssh {
            format!("git@github.com:{owner}/{repo}")
        } else {
            format!("https://github.com/{owner}/{repo}")
        }
    })
}

fn protocol() -> impl Strategy<Value = GitHubProtocol> {
    prop_oneof![Just(GitHubProtocol::Ssh), Just(GitHubProtocol::Https)]
}

proptest! {
    /// Converting twice with the same protocol changes nothing the second time.
    #[test]
    fn prop_convert_is_idempotent(url in github_url(), protocol in protocol()) {
        let once = convert_url_protocol(&url, protocol).unwrap();
        let twice = convert_url_protocol(&once, protocol).unwrap();
        prop_assert_eq!(once, twice);
    }

    /// Any supported URL converted to SSH has the SSH form.
    #[test]
    fn prop_https_to_ssh_has_ssh_form(url in github_url()) {
        let ssh = convert_url_protocol(&url, GitHubProtocol::Ssh).unwrap();
        prop_assert!(ssh.starts_with("git@github.com:"), "got {}", ssh);
    }

    /// The checkout directory does not depend on the protocol.
    #[test]
    fn prop_repo_name_survives_conversion(url in github_url(), protocol in protocol()) {
        let converted = convert_url_protocol(&url, protocol).unwrap();
        prop_assert_eq!(repo_name(&url), repo_name(&converted));
    }

    /// URLs without the GitHub host are rejected.
    #[test]
    fn prop_foreign_hosts_rejected(path in "[a-z]{1,10}/[a-z]{1,10}", ssh in proptest::bool::ANY) {
        let url = if ssh {
            format!("git@gitlab.com:{path}")
        } else {
            format!("https://gitlab.com/{path}")
        };
        prop_assert!(convert_url_protocol(&url, GitHubProtocol::Https).is_err());
    }
}
