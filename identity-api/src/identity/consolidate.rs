use shared_types::{Contact, IdentifyContact};
use std::collections::{BTreeSet, HashSet};
use tracing::{debug, info};

use super::{ContactStore, IdentifyError, LookupKey, NewContact};

/// Resolves `key` against the store, merging every cluster it touches under
/// the oldest primary and recording any unseen email or phone number.
///
/// Must run inside one transaction: the store is read, rewritten and read
/// again, and a concurrent writer must not observe the intermediate states.
pub fn consolidate<S>(store: &S, key: &LookupKey) -> Result<IdentifyContact, IdentifyError>
where
    S: ContactStore + ?Sized,
{
    let matches = store.find_by_email_or_phone(key.email(), key.phone_number())?;

    if matches.is_empty() {
        let created = store.create_contact(NewContact::primary(key))?;
        info!(contact_id = created.id, "Created new primary contact");
        return Ok(project(&created, std::slice::from_ref(&created)));
    }

    let mut primary_ids = BTreeSet::new();
    for contact in &matches {
        let primary_id = contact.primary_id().ok_or_else(|| {
            IdentifyError::IntegrityViolation(format!(
                "secondary contact {} has no linked primary",
                contact.id
            ))
        })?;
        primary_ids.insert(primary_id);
    }
    let primary_ids: Vec<i64> = primary_ids.into_iter().collect();

    let related = store.find_clusters(&primary_ids)?;
    debug!(
        matches = matches.len(),
        clusters = primary_ids.len(),
        related = related.len(),
        "Discovered related contacts"
    );

    let mut current_primaries: Vec<&Contact> =
        related.iter().filter(|c| c.is_primary()).collect();
    for id in &primary_ids {
        if !current_primaries.iter().any(|c| c.id == *id) {
            return Err(IdentifyError::IntegrityViolation(format!(
                "contact {id} is linked to as a primary but is not one"
            )));
        }
    }
    current_primaries.sort_by_key(|c| (c.created_at, c.id));

    let (final_primary, other_primaries) = match current_primaries.split_first() {
        Some((first, rest)) => ((*first).clone(), rest),
        None => {
            return Err(IdentifyError::IntegrityViolation(
                "matched contacts resolve to no primary".to_string(),
            ))
        }
    };

    for other in other_primaries {
        let demoted = store.demote_cluster(other.id, final_primary.id)?;
        info!(
            from = other.id,
            into = final_primary.id,
            rows = demoted,
            "Merged primary contact into older cluster"
        );
    }

    let mut group = store.find_clusters(&[final_primary.id])?;

    let email_is_new = key
        .email()
        .is_some_and(|email| !group.iter().any(|c| c.email.as_deref() == Some(email)));
    let phone_is_new = key
        .phone_number()
        .is_some_and(|phone| !group.iter().any(|c| c.phone_number.as_deref() == Some(phone)));

    if email_is_new || phone_is_new {
        let created = store.create_contact(NewContact::secondary(key, final_primary.id))?;
        info!(
            contact_id = created.id,
            primary_id = final_primary.id,
            "Added secondary contact with new information"
        );
        group.push(created);
    }

    Ok(project(&final_primary, &group))
}

/// Builds the consolidated view. The primary's own email and phone lead their
/// lists; everything else keeps the order of `group`.
pub fn project(primary: &Contact, group: &[Contact]) -> IdentifyContact {
    IdentifyContact {
        primary_contact_id: primary.id,
        emails: primary_first(
            primary.email.as_deref(),
            group.iter().filter_map(|c| c.email.as_deref()),
        ),
        phone_numbers: primary_first(
            primary.phone_number.as_deref(),
            group.iter().filter_map(|c| c.phone_number.as_deref()),
        ),
        secondary_contact_ids: group
            .iter()
            .filter(|c| !c.is_primary())
            .map(|c| c.id)
            .collect(),
    }
}

fn primary_first<'a>(
    primary_value: Option<&'a str>,
    values: impl Iterator<Item = &'a str>,
) -> Vec<String> {
    let mut seen = HashSet::new();
    primary_value
        .into_iter()
        .chain(values)
        .filter(|v| !v.is_empty() && seen.insert(*v))
        .map(str::to_string)
        .collect()
}
