//! Portfolio content sections.
//!
//! Sections are the 2D panels revealed when the visitor clicks an
//! interactable zone in the room (or opens the full portfolio from the
//! navbar). The 3D side only ever refers to them by [`SectionId`].

use std::fmt;

/// Identifier for a content panel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SectionId {
    AboutMe,
    WorkExperience,
    Skills,
    Projects,
    GameProject,
    Education,
    Contact,
}

impl SectionId {
    /// Every known section, in display order.
    pub const ALL: [SectionId; 7] = [
        SectionId::AboutMe,
        SectionId::WorkExperience,
        SectionId::Skills,
        SectionId::Projects,
        SectionId::GameProject,
        SectionId::Education,
        SectionId::Contact,
    ];

    /// Stable kebab-case id, used in config files and logs.
    pub fn as_id(&self) -> &'static str {
        match self {
            SectionId::AboutMe => "about-me",
            SectionId::WorkExperience => "work-experience",
            SectionId::Skills => "skills",
            SectionId::Projects => "projects",
            SectionId::GameProject => "game-project",
            SectionId::Education => "education",
            SectionId::Contact => "contact",
        }
    }

    /// Parses a kebab-case id. Unknown ids return `None`; callers decide
    /// whether that is worth a warning.
    pub fn from_id(id: &str) -> Option<SectionId> {
        SectionId::ALL.iter().copied().find(|s| s.as_id() == id)
    }
}

impl fmt::Display for SectionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_id())
    }
}

/// Static copy for one panel.
pub struct SectionContent {
    pub id: SectionId,
    pub title: &'static str,
    pub body: &'static [&'static str],
}

/// All panel copy, in [`SectionId::ALL`] order.
pub fn portfolio_sections() -> &'static [SectionContent] {
    &SECTIONS
}

static SECTIONS: [SectionContent; 7] = [
    SectionContent {
        id: SectionId::AboutMe,
        title: "About Me",
        body: &[
            "Software engineer with a soft spot for graphics programming and \
             tools that feel good to use.",
            "This room is my workspace: poke around, click on things, and the \
             camera will take you to the right shelf.",
        ],
    },
    SectionContent {
        id: SectionId::WorkExperience,
        title: "Work Experience",
        body: &[
            "Rendering engineer - built GPU-driven visualization pipelines and \
             kept the frame times honest.",
            "Previously: backend services, build tooling, and far too many \
             shader debugging sessions.",
        ],
    },
    SectionContent {
        id: SectionId::Skills,
        title: "Skills",
        body: &[
            "Rust, WGSL, and the usual systems toolbox.",
            "Real-time rendering, asset pipelines, profiling, and making \
             intimidating codebases approachable.",
        ],
    },
    SectionContent {
        id: SectionId::Projects,
        title: "Projects",
        body: &[
            "A grab bag of renderers, simulations, and small engines - the \
             posters on the wall each have a story.",
        ],
    },
    SectionContent {
        id: SectionId::GameProject,
        title: "Game Project",
        body: &[
            "A cozy exploration game, playable on the TV in the corner.",
            "Custom engine, hand-rolled physics, and a soundtrack recorded on \
             a borrowed synth.",
        ],
    },
    SectionContent {
        id: SectionId::Education,
        title: "Education",
        body: &["BSc in Computer Science, with a thesis on real-time global \
                 illumination."],
    },
    SectionContent {
        id: SectionId::Contact,
        title: "Contact",
        body: &["Find me on the usual code-hosting and bird-adjacent sites, or \
                 email hello@showroom.dev."],
    },
];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ids_round_trip() {
        for section in SectionId::ALL {
            assert_eq!(SectionId::from_id(section.as_id()), Some(section));
        }
    }

    #[test]
    fn unknown_id_is_none() {
        assert_eq!(SectionId::from_id("blog"), None);
        assert_eq!(SectionId::from_id(""), None);
    }

    #[test]
    fn content_covers_every_section() {
        let sections = portfolio_sections();
        assert_eq!(sections.len(), SectionId::ALL.len());
        for (content, id) in sections.iter().zip(SectionId::ALL) {
            assert_eq!(content.id, id);
            assert!(!content.body.is_empty());
        }
    }
}
