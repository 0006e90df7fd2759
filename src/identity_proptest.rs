//! Property-based tests for project identity resolution.
//!
//! These tests use proptest to generate remote URLs and tags and verify that
//! the naming and versioning invariants hold for all of them.

#[cfg(test)]
mod proptest_tests {
    use crate::identity::{project_name_from_url, ProjectIdentity, LATEST};
    use proptest::prelude::*;

    fn segment() -> impl Strategy<Value = String> {
        "[a-zA-Z0-9_-][a-zA-Z0-9_.-]{0,20}".prop_filter("must not end in .git", |s| {
            !s.ends_with(".git")
        })
    }

    proptest! {
        /// Property: `<scheme>://host/owner/repo(.git)` resolves to `repo`
        #[test]
        fn name_is_last_segment_of_url(
            scheme in prop::sample::select(vec!["https", "http", "git", "ssh"]),
            host in "[a-z]{1,10}\\.[a-z]{2,3}",
            owner in segment(),
            repo in segment(),
            suffix in prop::bool::ANY,
        ) {
            let url = format!(
                "{}://{}/{}/{}{}",
                scheme,
                host,
                owner,
                repo,
                if suffix { ".git" } else { "" }
            );
            prop_assert_eq!(project_name_from_url(&url), repo);
        }

        /// Property: scp-like `user@host:owner/repo(.git)` resolves to `repo`
        #[test]
        fn name_is_last_segment_of_scp_url(
            host in "[a-z]{1,10}\\.[a-z]{2,3}",
            owner in segment(),
            repo in segment(),
            suffix in prop::bool::ANY,
        ) {
            let url = format!("git@{}:{}/{}{}", host, owner, repo, if suffix { ".git" } else { "" });
            prop_assert_eq!(project_name_from_url(&url), repo);
        }

        /// Property: version and release never differ
        #[test]
        fn version_equals_release(tag in proptest::option::of(".*")) {
            let identity = ProjectIdentity::new("widgets", tag);
            prop_assert_eq!(identity.version(), identity.release());
        }

        /// Property: a non-blank tag is used verbatim
        #[test]
        fn tag_is_used_verbatim(tag in "v[0-9]{1,3}\\.[0-9]{1,3}\\.[0-9]{1,3}") {
            let identity = ProjectIdentity::new("widgets", Some(tag.clone()));
            prop_assert_eq!(identity.version(), tag.as_str());
        }

        /// Property: without a tag the version is always `latest`
        #[test]
        fn missing_tag_is_latest(name in ".*") {
            let identity = ProjectIdentity::new(name, None);
            prop_assert_eq!(identity.version(), LATEST);
        }
    }
}
