use clubdesk_api::activities::Activity;
use clubdesk_api::class_sessions::ClassSession;
use clubdesk_api::enrollments::Enrollment;
use clubdesk_api::members::Member;
use clubdesk_api::stats::{ActivityStats, StatsOverview};
use clubdesk_api::subscriptions::Subscription;
use clubdesk_api::WeekSchedule;
use clubdesk_core::SessionUser;

/// Left-aligned columns separated by two spaces.
pub fn table(headers: &[&str], rows: &[Vec<String>]) -> String {
    let mut widths: Vec<usize> = headers.iter().map(|h| h.chars().count()).collect();
    for row in rows {
        for (i, cell) in row.iter().enumerate() {
            if let Some(width) = widths.get_mut(i) {
                *width = (*width).max(cell.chars().count());
            }
        }
    }

    let mut out = vec![line(headers, &widths)];
    for row in rows {
        let cells: Vec<&str> = row.iter().map(String::as_str).collect();
        out.push(line(&cells, &widths));
    }
    out.join("\n")
}

fn line(cells: &[&str], widths: &[usize]) -> String {
    let padded: Vec<String> = cells
        .iter()
        .zip(widths)
        .map(|(cell, width)| format!("{:<width$}", cell, width = *width))
        .collect();
    padded.join("  ").trim_end().to_string()
}

pub fn user(user: &SessionUser) -> String {
    let role = if user.is_staff { "staff" } else { "member" };
    if user.email.is_empty() {
        format!("{} (#{}, {})", user.username, user.id, role)
    } else {
        format!("{} <{}> (#{}, {})", user.username, user.email, user.id, role)
    }
}

pub fn members(members: &[Member]) -> String {
    let rows: Vec<Vec<String>> = members
        .iter()
        .map(|m| {
            vec![
                m.id.to_string(),
                m.full_name(),
                m.age.to_string(),
                m.telephone.clone(),
                m.email.clone().unwrap_or_default(),
            ]
        })
        .collect();
    table(&["ID", "NAME", "AGE", "PHONE", "EMAIL"], &rows)
}

pub fn activities(activities: &[Activity]) -> String {
    let rows: Vec<Vec<String>> = activities
        .iter()
        .map(|a| {
            vec![
                a.id.to_string(),
                a.code_act.clone(),
                a.nom_act.clone(),
                format!("{:.2}", a.tarif_mensuel),
                a.capacite.to_string(),
            ]
        })
        .collect();
    table(&["ID", "CODE", "NAME", "MONTHLY", "CAPACITY"], &rows)
}

pub fn enrollments(enrollments: &[Enrollment]) -> String {
    let rows: Vec<Vec<String>> = enrollments
        .iter()
        .map(|e| {
            vec![
                e.id.to_string(),
                format!("{} {}", e.membre_prenom, e.membre_nom),
                e.activite_nom.clone(),
                e.date_inscription.to_string(),
            ]
        })
        .collect();
    table(&["ID", "MEMBER", "ACTIVITY", "SINCE"], &rows)
}

pub fn subscriptions(subscriptions: &[Subscription]) -> String {
    let rows: Vec<Vec<String>> = subscriptions
        .iter()
        .map(|s| {
            vec![
                s.id.to_string(),
                s.membre_nom.clone(),
                s.type_abonnement_display.clone(),
                s.date_debut.to_string(),
                s.date_fin.to_string(),
                if s.actif { "yes" } else { "no" }.to_string(),
            ]
        })
        .collect();
    table(&["ID", "MEMBER", "TYPE", "FROM", "TO", "ACTIVE"], &rows)
}

pub fn class_sessions(sessions: &[ClassSession]) -> String {
    let rows: Vec<Vec<String>> = sessions
        .iter()
        .map(|s| {
            vec![
                s.id.to_string(),
                s.date.to_string(),
                format!(
                    "{}-{}",
                    s.heure_debut.format("%H:%M"),
                    s.heure_fin.format("%H:%M")
                ),
                s.activite.nom_act.clone(),
            ]
        })
        .collect();
    table(&["ID", "DATE", "TIME", "ACTIVITY"], &rows)
}

pub fn stats(overview: &StatsOverview, activities: &[ActivityStats]) -> String {
    let popularity = |p: &Option<clubdesk_api::stats::Popularity>| match p {
        Some(p) => format!("{} ({} enrollments)", p.nom, p.inscriptions),
        None => "-".to_string(),
    };
    let rows: Vec<Vec<String>> = activities
        .iter()
        .map(|a| {
            vec![
                a.code_act.clone(),
                a.nom_act.clone(),
                format!("{}/{}", a.nb_inscriptions, a.capacite),
                a.places_disponibles.to_string(),
                format!("{:.0}%", a.fill_rate()),
            ]
        })
        .collect();

    format!(
        "Members: {}\nMost popular: {}\nLeast popular: {}\n\n{}",
        overview.total_members,
        popularity(&overview.most_popular_activity),
        popularity(&overview.least_popular_activity),
        table(&["CODE", "ACTIVITY", "ENROLLED", "FREE", "FILL"], &rows)
    )
}

/// One row per hour slot, one column per day. Cells list activity codes.
pub fn schedule(schedule: &WeekSchedule) -> String {
    let days = schedule.days();
    let mut headers = vec!["".to_string()];
    headers.extend(days.iter().map(|d| d.format("%a %d/%m").to_string()));

    let rows: Vec<Vec<String>> = schedule
        .slots()
        .into_iter()
        .map(|slot| {
            let mut row = vec![slot.format("%H:%M").to_string()];
            row.extend(days.iter().map(|day| {
                schedule
                    .cell(*day, slot)
                    .iter()
                    .map(|s| s.activite.code_act.as_str())
                    .collect::<Vec<_>>()
                    .join(",")
            }));
            row
        })
        .collect();

    let headers: Vec<&str> = headers.iter().map(String::as_str).collect();
    format!(
        "Week of {} to {}\n{}",
        schedule.monday(),
        schedule.saturday(),
        table(&headers, &rows)
    )
}
