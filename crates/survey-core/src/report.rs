//! Statistics report rendering.

use crate::poll::{Poll, Tally};

/// Render the aggregated statistics report: one section per poll in
/// catalog order, every option with its vote count, and a per-poll
/// total. `tallies` is positionally aligned with `polls`.
pub fn render(polls: &[Poll], tallies: &[Tally]) -> String {
    let mut out = String::from("📊 Survey statistics\n");

    if polls.is_empty() {
        out.push_str("\nNo polls configured yet.\n");
        return out;
    }

    for (index, poll) in polls.iter().enumerate() {
        let tally = tallies.get(index);
        out.push('\n');
        out.push_str(&format!("{}. {}\n", index + 1, poll.question));

        let mut total = 0u64;
        for (option_index, label) in poll.options.iter().enumerate() {
            let count = tally
                .and_then(|tally| tally.get(&option_index))
                .copied()
                .unwrap_or(0);
            total += count;
            out.push_str(&format!("  {label}: {count}\n"));
        }
        out.push_str(&format!("  total: {total}\n"));
    }

    out
}
