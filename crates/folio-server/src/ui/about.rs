use dioxus::prelude::*;
use folio_engine::Site;
use folio_engine::models::{CopyKey, Dated, Education, Experience, Skill};
use folio_engine::render::markdownify;

/// Profile image already resolved to a URL.
pub struct Profile<'a> {
    pub url: String,
    pub alt: &'a str,
}

fn profile_figure(profile: Option<&Profile<'_>>) -> Option<Element> {
    profile.map(|p| {
        rsx! {
            figure { class: "profile",
                img { src: "{p.url}", alt: "{p.alt}" }
            }
        }
    })
}

fn skill_card(skill: &Skill) -> Element {
    rsx! {
        li { class: "skill",
            if !skill.icon.is_empty() {
                i { class: "{skill.icon}", "aria-hidden": "true" }
            }
            h4 { "{skill.name}" }
            div { class: "skill-description", dangerous_inner_html: markdownify(&skill.description) }
        }
    }
}

pub fn about(site: &Site, skills: &[&Skill], profile: Option<&Profile<'_>>) -> Element {
    let text = |key: CopyKey| site.copy_text(key);
    let title = text(CopyKey::AboutTitle);
    let headline = text(CopyKey::AboutIntroHeadline);
    let skills_title = text(CopyKey::SkillsTitle);
    let quote = text(CopyKey::AboutQuote);
    let skills = skills.iter().map(|skill| skill_card(skill));

    rsx! {
        section { class: "about",
            h1 { "{title}" }
            div { class: "lead", dangerous_inner_html: markdownify(text(CopyKey::AboutLead)) }
            {profile_figure(profile)}
            h2 { "{headline}" }
            div {
                class: "intro-body",
                dangerous_inner_html: markdownify(text(CopyKey::AboutIntroBody)),
            }
            if !quote.is_empty() {
                blockquote { class: "about-quote",
                    p { "{quote}" }
                }
            }
        }
        section { class: "skills",
            h2 { "{skills_title}" }
            div { class: "lead", dangerous_inner_html: markdownify(text(CopyKey::SkillsLead)) }
            ul { {skills} }
        }
    }
}

/// One résumé line: what, where and when, then the markdown blurb.
fn timeline_entry(
    heading: &str,
    place: &str,
    location: &str,
    years: String,
    blurb: &str,
    extra: Option<Element>,
) -> Element {
    let location = if location.is_empty() {
        String::new()
    } else {
        format!(" · {location}")
    };
    rsx! {
        li { class: "resume-item",
            h4 { "{heading}" }
            p { class: "meta",
                span { class: "years", "{years}" }
                " · {place}{location}"
            }
            div { class: "blurb", dangerous_inner_html: markdownify(blurb) }
            {extra}
        }
    }
}

fn education_entry(entry: &Education) -> Element {
    timeline_entry(
        &entry.title,
        &entry.institution,
        &entry.location,
        entry.years(),
        &entry.blurb,
        None,
    )
}

fn experience_entry(entry: &Experience) -> Element {
    let bullets = entry.sorted_bullets();
    let bullets = (!bullets.is_empty()).then(|| {
        rsx! {
            ul { class: "bullets",
                for bullet in bullets {
                    li { "{bullet.text}" }
                }
            }
        }
    });
    timeline_entry(
        &entry.role,
        &entry.company,
        &entry.location,
        entry.years(),
        &entry.blurb,
        bullets,
    )
}

pub fn resume(education: &[Education], experience: &[Experience]) -> Element {
    let education = education.iter().map(education_entry);
    let experience = experience.iter().map(experience_entry);
    rsx! {
        h1 { "Résumé" }
        section { class: "resume-education",
            h2 { "Education" }
            ul { {education} }
        }
        section { class: "resume-experience",
            h2 { "Experience" }
            ul { {experience} }
        }
    }
}
