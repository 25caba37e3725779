//! Plain-text rendering of calendar views.

use todocal_core::{DayGroup, MonthSummary, Priority, Task, TaskCounts};

const SHORT_ID_CHARS: usize = 8;

pub fn year_view(months: &[MonthSummary<'_>]) -> String {
    if months.iter().all(|month| month.tasks.is_empty()) {
        return "No tasks for this year.\n".to_string();
    }

    let mut out = String::new();
    for month in months {
        out.push_str(&format!(
            "{} {} · {} tasks ({} done)\n",
            month.abbr, month.key, month.counts.total, month.counts.done
        ));
        if month.tasks.is_empty() {
            out.push_str("  No tasks\n");
            continue;
        }
        for day in &month.days {
            out.push_str(&format!(
                "  {} · {} ({} done)\n",
                day.key, day.counts.total, day.counts.done
            ));
            push_tasks(&mut out, &day.tasks, "    ");
        }
    }
    out
}

pub fn month_view(days: &[DayGroup<'_>]) -> String {
    if days.is_empty() {
        return "No tasks for this month.\n".to_string();
    }

    let mut out = String::new();
    for day in days {
        out.push_str(&day.key);
        out.push('\n');
        push_tasks(&mut out, &day.tasks, "  ");
    }
    out
}

pub fn day_view(tasks: &[Task]) -> String {
    if tasks.is_empty() {
        return "No tasks for this day.\n".to_string();
    }

    let refs: Vec<&Task> = tasks.iter().collect();
    let mut out = String::new();
    push_tasks(&mut out, &refs, "");
    out
}

pub fn footer(counts: &TaskCounts) -> String {
    format!(
        "Total: {} | Done: {} | Remaining: {}\n",
        counts.total, counts.done, counts.remaining
    )
}

pub fn stats(label: &str, counts: &TaskCounts) -> String {
    let mut out = format!("{label}\n");
    out.push_str(&footer(counts));
    for priority in Priority::ALL {
        out.push_str(&format!("  {priority}: {}\n", counts.for_priority(priority)));
    }
    out
}

fn push_tasks(out: &mut String, tasks: &[&Task], indent: &str) {
    for task in tasks {
        let mark = if task.done { 'x' } else { ' ' };
        out.push_str(&format!(
            "{indent}[{mark}] {} · {}  {}  ({})\n",
            task.date,
            task.title,
            task.priority,
            short_id(&task.id)
        ));
        if !task.notes.is_empty() {
            out.push_str(&format!("{indent}      {}\n", task.notes));
        }
    }
}

fn short_id(id: &str) -> &str {
    match id.char_indices().nth(SHORT_ID_CHARS) {
        Some((end, _)) => &id[..end],
        None => id,
    }
}
