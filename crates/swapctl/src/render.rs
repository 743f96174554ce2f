//! Output rendering for swapctl.
//!
//! Formats members and swap requests for terminal display.

use swap_core::{Id, Member, MemberRequests, SwapRequest};

/// Print a list of members in tabular format.
pub fn print_member_list(members: &[&Member]) {
    if members.is_empty() {
        println!("No members found.");
        return;
    }

    println!(
        "{:<36}  {:<20}  {:<18}  {:<6}  {}",
        "ID", "NAME", "LOCATION", "RATING", "OFFERS"
    );
    println!("{}", "-".repeat(110));

    for member in members {
        println!(
            "{:<36}  {:<20}  {:<18}  {:<6.1}  {}",
            member.id.0,
            truncate(&member.name, 20),
            truncate(member.location.as_deref().unwrap_or("-"), 18),
            member.rating,
            truncate(&join_or_dash(&member.skills_offered), 30),
        );
    }

    println!();
    println!("{} member(s)", members.len());
}

/// Print a full member profile.
pub fn print_member_details(member: &Member) {
    println!("Member: {}", member.id);
    println!();
    println!("  Name:          {}", member.name);
    println!("  Email:         {}", member.email);
    println!(
        "  Location:      {}",
        member.location.as_deref().unwrap_or("-")
    );
    println!("  Rating:        {:.1}", member.rating);
    println!(
        "  Visibility:    {}",
        if member.is_public { "public" } else { "hidden" }
    );
    if member.is_admin {
        println!("  Role:          admin");
    }
    println!();
    println!("  Offers:        {}", join_or_dash(&member.skills_offered));
    println!("  Wants:         {}", join_or_dash(&member.skills_wanted));
    println!("  Availability:  {}", join_or_dash(&member.availability));
    if let Some(ref bio) = member.bio {
        println!();
        println!("  {bio}");
    }
}

/// Print confirmation after registering a member.
pub fn print_member_registered(member: &Member) {
    println!("Registered member: {}", member.id);
    println!("  Name:   {}", member.name);
    println!("  Email:  {}", member.email);
    println!();
    println!("Act as this member with --actor {}", member.id);
}

/// Print confirmation after creating a request.
pub fn print_request_created(request: &SwapRequest) {
    println!("Created request: {}", request.id);
    println!("  To:     {}", request.receiver_id);
    println!(
        "  Trade:  {} for {}",
        request.skill_offered, request.skill_wanted
    );
    println!("  Status: {}", request.status);
}

/// Print a request after a status change.
pub fn print_request_updated(request: &SwapRequest) {
    println!("Request {} is now {}", request.id, request.status);
    if let Some(rating) = request.rating {
        println!("  Rating:   {rating}/5");
    }
    if let Some(feedback) = request.feedback.as_deref().filter(|f| !f.is_empty()) {
        println!("  Feedback: {feedback}");
    }
}

/// Print a member's received and sent requests.
pub fn print_request_listing(listing: &MemberRequests<'_>) {
    println!("Received:");
    print_request_table(&listing.received, requester, "FROM");
    println!();
    println!("Sent:");
    print_request_table(&listing.sent, receiver, "TO");
}

fn requester(request: &SwapRequest) -> &Id {
    &request.requester_id
}

fn receiver(request: &SwapRequest) -> &Id {
    &request.receiver_id
}

fn print_request_table(
    requests: &[&SwapRequest],
    counterpart: fn(&SwapRequest) -> &Id,
    counterpart_header: &str,
) {
    if requests.is_empty() {
        println!("  (none)");
        return;
    }

    println!(
        "  {:<36}  {:<10}  {:<10}  {:<36}  {:<20}",
        "ID", counterpart_header, "STATUS", "TRADE", "CREATED"
    );
    println!("  {}", "-".repeat(120));

    for request in requests {
        let trade = format!("{} for {}", request.skill_offered, request.skill_wanted);
        println!(
            "  {:<36}  {:<10}  {:<10}  {:<36}  {:<20}",
            request.id.0,
            truncate(&counterpart(request).0, 10),
            request.status.as_str(),
            truncate(&trade, 36),
            format_time(&request.created_at),
        );
    }
}

fn join_or_dash(values: &[String]) -> String {
    if values.is_empty() {
        "-".to_string()
    } else {
        values.join(", ")
    }
}

fn format_time(dt: &chrono::DateTime<chrono::Utc>) -> String {
    dt.format("%Y-%m-%d %H:%M:%S").to_string()
}

fn truncate(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        s.to_string()
    } else {
        let kept: String = s.chars().take(max_len.saturating_sub(3)).collect();
        format!("{kept}...")
    }
}
