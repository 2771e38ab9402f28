//! Field rules shared by the request DTOs.
use chrono::{Datelike, Utc};

use crate::services::auth::Role;

/// Length in characters (not bytes) within `min..=max`.
pub(super) fn char_len_between(value: &str, min: usize, max: usize) -> bool {
    (min..=max).contains(&value.chars().count())
}

pub(super) fn digit_count(value: i64) -> usize {
    if value < 0 {
        return 0;
    }
    value.to_string().len()
}

fn nip_prefix(role: Role) -> &'static str {
    match role {
        Role::Operator => "615",
        Role::Caregiver => "303",
    }
}

/// NIP layout: `<prefix:3><gender:1><year:4><month:2><serial:3..5>`.
pub(super) fn is_valid_nip(nip: i64, role: Role) -> bool {
    is_valid_nip_at(nip, role, Utc::now().year())
}

pub(super) fn is_valid_nip_at(nip: i64, role: Role, current_year: i32) -> bool {
    if nip < 0 {
        return false;
    }
    let s = nip.to_string();
    if !(13..=15).contains(&s.len()) {
        return false;
    }
    if &s[0..3] != nip_prefix(role) {
        return false;
    }
    if !matches!(&s[3..4], "1" | "2") {
        return false;
    }
    let Ok(year) = s[4..8].parse::<i32>() else {
        return false;
    };
    if !(2000..=current_year).contains(&year) {
        return false;
    }
    let Ok(month) = s[8..10].parse::<u32>() else {
        return false;
    };
    (1..=12).contains(&month)
}

/// Absolute http(s) URL whose host contains at least one dot.
pub(super) fn is_image_url(value: &str) -> bool {
    let Ok(url) = url::Url::parse(value) else {
        return false;
    };
    if !matches!(url.scheme(), "http" | "https") {
        return false;
    }
    url.host_str()
        .is_some_and(|host| host.contains('.') && !host.starts_with('.') && !host.ends_with('.'))
}
