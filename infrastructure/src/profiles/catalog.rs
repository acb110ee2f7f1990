//! Static profile catalog.
//!
//! Holds a fixed set of [`Profile`]s, either the built-in roles or those
//! read from `[profiles.<name>]` config sections layered over them.

use crate::tools::{command, comment, document, file, git, introspection, ticket};
use board_application::ports::profile_catalog::ProfileCatalog;
use board_domain::Profile;
use std::collections::BTreeMap;

pub const RESEARCHER: &str = "researcher";
pub const PLANNER: &str = "planner";
pub const DEVELOPER: &str = "developer";
pub const REVIEWER: &str = "reviewer";

#[derive(Debug, Clone, Default)]
pub struct StaticProfileCatalog {
    profiles: BTreeMap<String, Profile>,
}

impl StaticProfileCatalog {
    pub fn new(profiles: impl IntoIterator<Item = Profile>) -> Self {
        Self {
            profiles: profiles
                .into_iter()
                .map(|p| (p.name.clone(), p))
                .collect(),
        }
    }

    /// Insert a profile, replacing any existing one with the same name.
    pub fn with_profile(mut self, profile: Profile) -> Self {
        self.profiles.insert(profile.name.clone(), profile);
        self
    }

    /// The four stock roles of the ticket lifecycle.
    pub fn builtin() -> Self {
        Self::new([
            Profile::new(
                RESEARCHER,
                [
                    file::READ_FILE,
                    file::LIST_FILES,
                    git::GIT_STATUS,
                    git::GIT_DIFF,
                    ticket::GET_TICKET,
                    ticket::UPDATE_TICKET_STATE,
                    comment::POST_COMMENT,
                    document::SAVE_DOCUMENT,
                    introspection::LIST_MY_TOOLS,
                ],
            )
            .with_system_prompt(
                "You are a researcher. Investigate the codebase and the ticket, \
                 then record what you learned as a research document.",
            )
            .with_workflow(
                "1. Read the ticket.\n2. Explore the relevant code.\n\
                 3. Save a research document.\n4. Move the ticket to plan_approval.",
            ),
            Profile::new(
                PLANNER,
                [
                    file::READ_FILE,
                    file::LIST_FILES,
                    git::GIT_STATUS,
                    ticket::GET_TICKET,
                    ticket::UPDATE_TICKET_STATE,
                    comment::POST_COMMENT,
                    document::SAVE_DOCUMENT,
                    introspection::LIST_MY_TOOLS,
                ],
            )
            .with_system_prompt(
                "You are a planner. Turn research into a concrete, reviewable \
                 implementation plan.",
            )
            .with_workflow(
                "1. Read the ticket and its research.\n\
                 2. Save an implementation_plan document.\n3. Ask for approval if anything is unclear.",
            ),
            Profile::new(
                DEVELOPER,
                [
                    file::READ_FILE,
                    file::WRITE_FILE,
                    file::EDIT_FILE,
                    file::LIST_FILES,
                    command::RUN_COMMAND,
                    git::GIT_STATUS,
                    git::GIT_DIFF,
                    git::GIT_COMMIT,
                    git::GIT_PUSH,
                    ticket::GET_TICKET,
                    ticket::UPDATE_TICKET_STATE,
                    comment::POST_COMMENT,
                    document::SAVE_DOCUMENT,
                    introspection::LIST_MY_TOOLS,
                ],
            )
            .with_system_prompt(
                "You are a developer. Implement the approved plan with small, \
                 tested changes and commit your work.",
            )
            .with_workflow(
                "1. Read the ticket and plan.\n2. Edit code and run the tests.\n\
                 3. Commit and push.\n4. Move the ticket to verification.",
            ),
            Profile::new(
                REVIEWER,
                [
                    file::READ_FILE,
                    file::LIST_FILES,
                    command::RUN_COMMAND,
                    git::GIT_STATUS,
                    git::GIT_DIFF,
                    ticket::GET_TICKET,
                    ticket::UPDATE_TICKET_STATE,
                    comment::POST_COMMENT,
                    introspection::LIST_MY_TOOLS,
                ],
            )
            .with_system_prompt(
                "You are a reviewer. Verify the change against the acceptance \
                 criteria and either finish the ticket or send it back.",
            )
            .with_workflow(
                "1. Read the ticket.\n2. Inspect the diff and run the tests.\n\
                 3. Move the ticket to done, or back to in_progress with comments.",
            ),
        ])
    }

    pub fn len(&self) -> usize {
        self.profiles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.profiles.is_empty()
    }
}

impl ProfileCatalog for StaticProfileCatalog {
    fn profile(&self, name: &str) -> Option<Profile> {
        self.profiles.get(name).cloned()
    }

    fn profile_names(&self) -> Vec<String> {
        self.profiles.keys().cloned().collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_roles() {
        let catalog = StaticProfileCatalog::builtin();
        assert_eq!(
            catalog.profile_names(),
            vec![DEVELOPER, PLANNER, RESEARCHER, REVIEWER]
        );

        let developer = catalog.profile(DEVELOPER).unwrap();
        assert!(developer.allows(file::EDIT_FILE));
        assert!(developer.allows(git::GIT_PUSH));
        assert!(!developer.system_prompt.is_empty());

        let reviewer = catalog.profile(REVIEWER).unwrap();
        assert!(!reviewer.allows(file::WRITE_FILE));
    }

    #[test]
    fn test_with_profile_replaces() {
        let catalog = StaticProfileCatalog::builtin()
            .with_profile(Profile::new(REVIEWER, [file::READ_FILE]))
            .with_profile(Profile::new("auditor", [file::LIST_FILES]));

        assert_eq!(catalog.len(), 5);
        assert_eq!(catalog.profile(REVIEWER).unwrap().tools, vec![file::READ_FILE]);
        assert!(catalog.profile("nobody").is_none());
    }
}
