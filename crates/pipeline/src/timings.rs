use std::time::Duration;

/// Wall-clock time spent in each pipeline phase of one request.
///
/// A phase that never ran stays `None`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PhaseTimings {
	pub parse: Option<Duration>,
	pub fetch: Option<Duration>,
	pub compile: Option<Duration>,
	pub emit: Option<Duration>,
	pub invoke: Option<Duration>,
}

impl PhaseTimings {
	/// Sum of the phases that ran.
	pub fn total(&self) -> Duration {
		[self.parse, self.fetch, self.compile, self.emit, self.invoke].into_iter().flatten().sum()
	}
}

pub(crate) fn format_duration(duration: Duration) -> String {
	format!("{:.2}ms", duration.as_secs_f64() * 1000.0)
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn total_skips_phases_that_did_not_run() {
		let timings = PhaseTimings {
			parse: Some(Duration::from_millis(2)),
			emit: Some(Duration::from_millis(5)),
			..PhaseTimings::default()
		};
		assert_eq!(timings.total(), Duration::from_millis(7));
		assert_eq!(PhaseTimings::default().total(), Duration::ZERO);
	}

	#[test]
	fn durations_format_as_milliseconds() {
		assert_eq!(format_duration(Duration::from_micros(1500)), "1.50ms");
	}
}
