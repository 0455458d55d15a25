//! Free-text task parser.
//!
//! One task per non-empty line: `Name [minutes|minutesRrepeats]`, with an
//! optional leading checklist or bullet marker.
//!
//! ```text
//! - [ ] Write report 25      -> "Write report", 25 min
//! Work 5r3                   -> "Work" x3, 5 min each
//! Meditate                   -> "Meditate", 10 min (default)
//! ```

use super::Task;

/// Duration used when a line carries no parseable time.
pub const DEFAULT_TASK_SECS: i64 = 10 * 60;

/// Upper bound on the expansion of a single repeated line.
pub const MAX_REPETITIONS: u32 = 1000;

const LIST_MARKERS: [&str; 4] = ["- [ ] ", "- [x] ", "- [X] ", "- "];

/// Parse raw multi-line text into an ordered task queue.
///
/// Total over any input: malformed numbers degrade to defaults and
/// unexpected tokens become part of the task name.
pub fn parse_tasks(text: &str) -> Vec<Task> {
    text.split('\n')
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .flat_map(|line| parse_line(strip_list_marker(line)))
        .collect()
}

/// Strip the first matching checklist/bullet marker from a trimmed line.
pub fn strip_list_marker(line: &str) -> &str {
    LIST_MARKERS
        .iter()
        .find_map(|marker| line.strip_prefix(marker))
        .unwrap_or(line)
}

/// Trim every line and drop its checklist marker, keeping line structure.
pub fn normalize_input(text: &str) -> String {
    text.split('\n')
        .map(|line| strip_list_marker(line.trim()))
        .collect::<Vec<_>>()
        .join("\n")
}

fn parse_line(line: &str) -> Vec<Task> {
    let parts: Vec<&str> = line.split(' ').collect();
    let Some((&last, head)) = parts.split_last().filter(|_| parts.len() > 1) else {
        return vec![Task::new(line, DEFAULT_TASK_SECS)];
    };

    let mut name_parts = head.to_vec();
    let mut time_secs = DEFAULT_TASK_SECS;
    let mut repeats: i64 = 1;

    if let Some((minutes, count)) = split_repeat_token(last) {
        time_secs = minutes_to_secs(minutes);
        repeats = count;
    } else if let Some(minutes) = coerce_number(last) {
        time_secs = minutes_to_secs(minutes);
    } else {
        name_parts.push(last);
    }

    let name = name_parts.join(" ");
    if repeats == 1 {
        return vec![Task::new(name, time_secs)];
    }

    let count = repeats.clamp(0, MAX_REPETITIONS as i64) as u32;
    (1..=count)
        .map(|index| Task {
            name: name.clone(),
            time_secs,
            repetition_count: count,
            index: Some(index),
        })
        .collect()
}

/// `10r2` -> `(10.0, 2)`. Both halves must be numbers, the count strictly
/// an integer.
fn split_repeat_token(token: &str) -> Option<(f64, i64)> {
    let (minutes, count) = token.split_once('r')?;
    let minutes = coerce_number(minutes)?;
    if !is_integer(count) {
        return None;
    }
    Some((minutes, count.parse().ok()?))
}

fn minutes_to_secs(minutes: f64) -> i64 {
    (minutes * 60.0).round() as i64
}

/// Strict integer pattern: optional `-` followed by ASCII digits.
pub fn is_integer(value: &str) -> bool {
    let digits = value.strip_prefix('-').unwrap_or(value);
    !digits.is_empty() && digits.bytes().all(|b| b.is_ascii_digit())
}

/// Permissive numeric coercion.
///
/// Accepts signed decimals, fractions, exponents and `0x`/`0o`/`0b`
/// literals. The empty string and non-finite values are not numbers.
pub fn coerce_number(value: &str) -> Option<f64> {
    let value = value.trim();
    if value.is_empty() {
        return None;
    }
    if let Some(n) = parse_radix_literal(value) {
        return Some(n);
    }
    if !value
        .bytes()
        .all(|b| b.is_ascii_digit() || matches!(b, b'.' | b'e' | b'E' | b'+' | b'-'))
    {
        return None;
    }
    value.parse::<f64>().ok().filter(|n| n.is_finite())
}

fn parse_radix_literal(value: &str) -> Option<f64> {
    let radix = match value.get(..2)? {
        "0x" | "0X" => 16,
        "0o" | "0O" => 8,
        "0b" | "0B" => 2,
        _ => return None,
    };
    u64::from_str_radix(&value[2..], radix)
        .ok()
        .map(|n| n as f64)
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn name_and_minutes() {
        let tasks = parse_tasks("Write report 25");
        assert_eq!(tasks, vec![Task::new("Write report", 1500)]);
    }

    #[test]
    fn repeat_expansion() {
        let tasks = parse_tasks("Work 5r3");
        assert_eq!(tasks.len(), 3);
        for (i, task) in tasks.iter().enumerate() {
            assert_eq!(task.name, "Work");
            assert_eq!(task.time_secs, 300);
            assert_eq!(task.repetition_count, 3);
            assert_eq!(task.index, Some(i as u32 + 1));
        }
    }

    #[test]
    fn ten_minutes_twice() {
        let tasks = parse_tasks("Stretch 10r2");
        assert_eq!(tasks.len(), 2);
        assert!(tasks.iter().all(|t| t.time_secs == 600));
    }

    #[test]
    fn single_repeat_has_no_index() {
        let tasks = parse_tasks("Email 15r1");
        assert_eq!(tasks, vec![Task::new("Email", 900)]);
    }

    #[test]
    fn single_token_is_name_only() {
        assert_eq!(parse_tasks("Meditate"), vec![Task::new("Meditate", 600)]);
        assert_eq!(parse_tasks("25"), vec![Task::new("25", 600)]);
        assert_eq!(parse_tasks("5r3"), vec![Task::new("5r3", 600)]);
    }

    #[test]
    fn empty_repeat_prefix_becomes_name() {
        assert_eq!(parse_tasks("Task r2"), vec![Task::new("Task r2", 600)]);
    }

    #[test]
    fn non_integer_repeat_count_becomes_name() {
        assert_eq!(parse_tasks("Read 5r2.5"), vec![Task::new("Read 5r2.5", 600)]);
        assert_eq!(parse_tasks("Run errands"), vec![Task::new("Run errands", 600)]);
    }

    #[test]
    fn non_numeric_last_token_joins_name() {
        assert_eq!(parse_tasks("Call mom"), vec![Task::new("Call mom", 600)]);
    }

    #[test]
    fn checklist_markers_are_stripped() {
        let expected = vec![Task::new("Read", 1200)];
        assert_eq!(parse_tasks("- [x] Read 20"), expected);
        assert_eq!(parse_tasks("- [X] Read 20"), expected);
        assert_eq!(parse_tasks("- [ ] Read 20"), expected);
        assert_eq!(parse_tasks("- Read 20"), expected);
        assert_eq!(parse_tasks("   - Read 20  "), expected);
    }

    #[test]
    fn only_first_marker_is_stripped() {
        assert_eq!(parse_tasks("- [ ] - Read 20"), vec![Task::new("- Read", 1200)]);
    }

    #[test]
    fn blank_lines_are_skipped_and_order_kept() {
        let tasks = parse_tasks("A 1\n\n   \nB 2r2\r\nC");
        let names: Vec<String> = tasks.iter().map(Task::display_name).collect();
        assert_eq!(names, ["A", "B (1)", "B (2)", "C"]);
        assert_eq!(tasks[0].time_secs, 60);
        assert_eq!(tasks[3].time_secs, 600);
    }

    #[test]
    fn fractional_and_signed_minutes() {
        assert_eq!(parse_tasks("Tea 1.5")[0].time_secs, 90);
        assert_eq!(parse_tasks("Tea -2")[0].time_secs, -120);
        assert_eq!(parse_tasks("Tea 0x2")[0].time_secs, 120);
        assert_eq!(parse_tasks("Tea 1e1")[0].time_secs, 600);
    }

    #[test]
    fn non_positive_repeat_emits_nothing() {
        assert!(parse_tasks("Work 5r0").is_empty());
        assert!(parse_tasks("Work 5r-2").is_empty());
    }

    #[test]
    fn repeat_count_is_capped() {
        let tasks = parse_tasks("Pushups 1r999999");
        assert_eq!(tasks.len(), MAX_REPETITIONS as usize);
        assert_eq!(tasks.last().unwrap().index, Some(MAX_REPETITIONS));
    }

    #[test]
    fn double_spaces_stay_in_name() {
        assert_eq!(parse_tasks("Deep  work 30"), vec![Task::new("Deep  work", 1800)]);
    }

    #[test]
    fn coercion_rules() {
        assert_eq!(coerce_number("12"), Some(12.0));
        assert_eq!(coerce_number("-0.5"), Some(-0.5));
        assert_eq!(coerce_number(""), None);
        assert_eq!(coerce_number("inf"), None);
        assert_eq!(coerce_number("Infinity"), None);
        assert_eq!(coerce_number("1e400"), None);
        assert_eq!(coerce_number("abc"), None);
        assert!(is_integer("-3"));
        assert!(!is_integer("-"));
        assert!(!is_integer("3.0"));
        assert!(!is_integer("+3"));
    }

    #[test]
    fn normalize_keeps_lines() {
        let text = "- [x] Done 5\n  - [ ] Todo 10\n\n- Plain";
        assert_eq!(normalize_input(text), "Done 5\nTodo 10\n\nPlain");
    }

    proptest! {
        #[test]
        fn name_then_integer_minutes(name in "[A-Za-z]{1,12}", minutes in -500i64..500) {
            let tasks = parse_tasks(&format!("{name} {minutes}"));
            prop_assert_eq!(tasks.len(), 1);
            prop_assert_eq!(&tasks[0].name, &name);
            prop_assert_eq!(tasks[0].time_secs, minutes * 60);
            prop_assert_eq!(tasks[0].repetition_count, 1);
            prop_assert_eq!(tasks[0].index, None);
        }

        #[test]
        fn parser_is_total(text in "\\PC{0,200}") {
            for task in parse_tasks(&text) {
                prop_assert!(task.repetition_count >= 1);
            }
        }
    }
}
