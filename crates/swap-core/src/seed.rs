//! Demo roster installed into an empty directory.

use crate::types::{Id, Member};

fn tags(values: &[&str]) -> Vec<String> {
    values.iter().map(|v| (*v).to_string()).collect()
}

fn demo_member(
    id: &str,
    name: &str,
    email: &str,
    location: &str,
    photo: &str,
    offered: &[&str],
    wanted: &[&str],
    availability: &[&str],
    rating: f64,
    bio: &str,
) -> Member {
    Member {
        id: Id::from(id),
        name: name.to_string(),
        email: email.to_string(),
        location: Some(location.to_string()),
        profile_photo: Some(format!(
            "https://images.pexels.com/photos/{photo}/pexels-photo-{photo}.jpeg?auto=compress&cs=tinysrgb&w=150"
        )),
        skills_offered: tags(offered),
        skills_wanted: tags(wanted),
        availability: tags(availability),
        is_public: true,
        is_admin: false,
        rating,
        bio: Some(bio.to_string()),
    }
}

/// The four public demo members, ids `1` to `4`.
pub fn demo_members() -> Vec<Member> {
    vec![
        demo_member(
            "1",
            "Alice Johnson",
            "alice@example.com",
            "New York, NY",
            "774909",
            &["Graphic Design", "Photoshop", "Illustrator"],
            &["Web Development", "React"],
            &["Weekends", "Evenings"],
            4.8,
            "Creative designer with 5+ years of experience in visual communication.",
        ),
        demo_member(
            "2",
            "Bob Smith",
            "bob@example.com",
            "San Francisco, CA",
            "220453",
            &["Web Development", "React", "Node.js"],
            &["UI/UX Design", "Photoshop"],
            &["Weekdays", "Evenings"],
            4.9,
            "Full-stack developer passionate about creating amazing user experiences.",
        ),
        demo_member(
            "3",
            "Carol Davis",
            "carol@example.com",
            "Austin, TX",
            "415829",
            &["Data Analysis", "Excel", "Python"],
            &["Machine Learning", "SQL"],
            &["Weekends"],
            4.7,
            "Data analyst helping businesses make data-driven decisions.",
        ),
        demo_member(
            "4",
            "David Wilson",
            "david@example.com",
            "Seattle, WA",
            "697509",
            &["Digital Marketing", "SEO", "Content Writing"],
            &["Graphic Design", "Video Editing"],
            &["Evenings", "Weekends"],
            4.6,
            "Marketing specialist with expertise in digital growth strategies.",
        ),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn demo_members_are_public_with_unique_ids_and_emails() {
        let members = demo_members();
        assert_eq!(members.len(), 4);
        assert!(members.iter().all(|m| m.is_public && !m.is_admin));

        let ids: HashSet<_> = members.iter().map(|m| m.id.clone()).collect();
        let emails: HashSet<_> = members.iter().map(|m| m.email.as_str()).collect();
        assert_eq!(ids.len(), 4);
        assert_eq!(emails.len(), 4);
    }
}
