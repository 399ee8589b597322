//! Static page content. Pure data: the page shell decides how each record is
//! laid out and animated.

use std::f32::consts::FRAC_PI_2;

use serde::{Deserialize, Serialize};

use crate::domain::{MotionObject, ObjectId, Vec3};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NavLink {
    pub label: String,
    pub anchor: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProjectRecord {
    pub title: String,
    pub category: String,
    pub description: String,
    pub image_path: String,
    #[serde(default)]
    pub tags: Vec<String>,
    pub source_url: Option<String>,
    pub live_url: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SkillCategory {
    pub title: String,
    pub skills: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Stat {
    pub value: String,
    pub label: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContactDetail {
    pub title: String,
    pub content: String,
    pub description: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PageContent {
    pub nav_links: Vec<NavLink>,
    pub hero_lines: Vec<String>,
    pub services: Vec<String>,
    pub skills: Vec<SkillCategory>,
    pub stats: Vec<Stat>,
    pub projects: Vec<ProjectRecord>,
    pub contact_details: Vec<ContactDetail>,
    /// Path of the downloadable résumé, relative to the assets root.
    pub resume_asset: String,
    pub hero_scene: Vec<MotionObject>,
}

impl Default for PageContent {
    fn default() -> Self {
        Self {
            nav_links: default_nav_links(),
            hero_lines: vec![
                "Hi, I'm the developer behind this page".into(),
                "B.Tech Computer Science (AI & ML) Student".into(),
                "iOS apps, full-stack web and AI-driven solutions.".into(),
                "Download CV".into(),
            ],
            services: [
                "iOS App Development",
                "Web Development",
                "AI & Machine Learning",
                "UI/UX Design",
                "CoreML Integration",
                "Graphic Designing",
            ]
            .into_iter()
            .map(String::from)
            .collect(),
            skills: default_skills(),
            stats: vec![
                stat("8.41", "CGPA"),
                stat("0", "Years Experience"),
                stat("92%", "ML Model Accuracy"),
                stat("95%", "Project Success Rate"),
            ],
            projects: default_projects(),
            contact_details: vec![
                detail("Email", "hello@example.com", "Send me an email anytime!"),
                detail("Phone", "+00 0000000000", "Call me for urgent projects"),
                detail("Location", "Remote", "Available for remote work"),
                detail("Response Time", "24 hours", "I usually respond quickly"),
            ],
            resume_asset: "resume.pdf".into(),
            hero_scene: default_hero_scene(),
        }
    }
}

pub fn default_nav_links() -> Vec<NavLink> {
    [
        ("Home", "#home"),
        ("About", "#about"),
        ("Skills", "#skills"),
        ("Projects", "#projects"),
        ("Contact", "#contact"),
    ]
    .into_iter()
    .map(|(label, anchor)| NavLink {
        label: label.into(),
        anchor: anchor.into(),
    })
    .collect()
}

/// The two animated hero shapes: a box bobbing on a sine and a sphere on a
/// cosine (sine shifted by a quarter turn).
pub fn default_hero_scene() -> Vec<MotionObject> {
    vec![
        MotionObject {
            id: ObjectId(1),
            base_position: Vec3::new(-3.0, 0.0, -2.0),
            amplitude: 0.5,
            frequency: 1.0,
            angular_speed: Vec3::new(0.3, 0.2, 0.0),
            phase_offset: 0.0,
        },
        MotionObject {
            id: ObjectId(2),
            base_position: Vec3::new(3.0, 1.0, -1.0),
            amplitude: 0.3,
            frequency: 0.8,
            angular_speed: Vec3::new(0.2, 0.0, 0.3),
            phase_offset: FRAC_PI_2,
        },
    ]
}

fn default_skills() -> Vec<SkillCategory> {
    let category = |title: &str, skills: &[&str]| SkillCategory {
        title: title.into(),
        skills: skills.iter().map(|s| s.to_string()).collect(),
    };
    vec![
        category("Programming Languages", &["Java", "Python", "Swift", "C"]),
        category(
            "Web Development",
            &["HTML", "CSS", "JavaScript", "Firebase", "MERN stack"],
        ),
        category(
            "AI & Machine Learning",
            &["CoreML", "TensorFlow", "PyTorch", "OpenCV", "NLP", "Scikit-learn"],
        ),
        category(
            "Databases & Cloud",
            &["MySQL", "MongoDB", "Firebase", "Firestore"],
        ),
        category(
            "Tools & Platforms",
            &["Xcode", "VS Code", "Git/GitHub", "Jira", "Figma"],
        ),
        category(
            "Soft Skills",
            &[
                "Problem Solving",
                "Critical Thinking",
                "Communication",
                "Teamwork",
                "Adaptability",
            ],
        ),
    ]
}

fn default_projects() -> Vec<ProjectRecord> {
    let project = |title: &str, category: &str, description: &str, image: &str, tags: &[&str]| {
        ProjectRecord {
            title: title.into(),
            category: category.into(),
            description: description.into(),
            image_path: image.into(),
            tags: tags.iter().map(|t| t.to_string()).collect(),
            source_url: None,
            live_url: None,
        }
    };
    vec![
        project(
            "AlzyCare - Alzheimer's Caregiver Support App",
            "iOS Development",
            "Cognitive assessment, daily task recommendations and reminiscence therapy.",
            "Alzycare.png",
            &["iOS", "CoreML", "Firebase", "Core Data", "UIKit"],
        ),
        project(
            "Fingerprint Recognition System",
            "AI/ML",
            "Biometric authentication using OpenCV SIFT matching with MySQL integration.",
            "Fingerprint.png",
            &["Python", "OpenCV", "scikit-learn", "MySQL", "Computer Vision"],
        ),
        project(
            "SafeBite - Food Allergy Detection App",
            "iOS Development",
            "OCR-based allergen detection from food labels.",
            "Safebite.jpg",
            &["SwiftUI", "OCR", "Machine Learning"],
        ),
        project(
            "Hospital Management System",
            "iOS Development",
            "Admin and doctor iPad apps with PencilKit plus a patient iPhone app.",
            "HMS.png",
            &["UIKit", "Firebase", "PencilKit"],
        ),
        project(
            "Portfolio Website",
            "Web Development",
            "This page: reveal animations, a procedural 3D hero and a contact form.",
            "Portfolio.png",
            &["3D Graphics", "Responsive Design"],
        ),
    ]
}

fn stat(value: &str, label: &str) -> Stat {
    Stat {
        value: value.into(),
        label: label.into(),
    }
}

fn detail(title: &str, content: &str, description: &str) -> ContactDetail {
    ContactDetail {
        title: title.into(),
        content: content.into(),
        description: description.into(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_toml_keeps_remaining_defaults() {
        let raw = r##"
resume_asset = "cv/latest.pdf"

[[nav_links]]
label = "Work"
anchor = "#projects"
"##;
        let content: PageContent = toml::from_str(raw).expect("parse content");
        assert_eq!(content.resume_asset, "cv/latest.pdf");
        assert_eq!(content.nav_links.len(), 1);
        assert_eq!(content.nav_links[0].label, "Work");
        assert_eq!(content.projects, PageContent::default().projects);
    }

    #[test]
    fn hero_scene_has_distinct_ids() {
        let scene = default_hero_scene();
        assert_eq!(scene.len(), 2);
        assert_ne!(scene[0].id, scene[1].id);
    }
}
