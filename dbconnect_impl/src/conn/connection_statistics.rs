/// Counters and timings of the database calls that were done through a connection.
#[derive(Debug, Clone)]
pub struct ConnectionStatistics {
    sequence_number: u32,
    reset_base: u32,
    execute_count: u32,
    select_count: u32,
    error_count: u32,
    fetched_rows: u64,
    created_at: time::OffsetDateTime,
    last_reset_at: time::OffsetDateTime,
    wait_time: std::time::Duration,
}

impl Default for ConnectionStatistics {
    fn default() -> Self {
        let timestamp = time::OffsetDateTime::now_utc();
        Self {
            created_at: timestamp,
            last_reset_at: timestamp,
            sequence_number: 0,
            reset_base: 0,
            execute_count: 0,
            select_count: 0,
            error_count: 0,
            fetched_rows: 0,
            wait_time: std::time::Duration::default(),
        }
    }
}

impl ConnectionStatistics {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn reset(&mut self) {
        *self = Self {
            created_at: self.created_at,
            last_reset_at: time::OffsetDateTime::now_utc(),
            sequence_number: self.sequence_number,
            reset_base: self.sequence_number,
            ..Default::default()
        };
    }

    pub(crate) fn next_sequence_number(&mut self) -> u32 {
        self.sequence_number += 1;
        self.sequence_number
    }

    pub(crate) fn add_execute(&mut self) {
        self.execute_count += 1;
    }

    pub(crate) fn add_select(&mut self, row_count: usize) {
        self.select_count += 1;
        self.fetched_rows += row_count as u64;
    }

    pub(crate) fn add_error(&mut self) {
        self.error_count += 1;
    }
    pub(crate) fn add_wait_time(&mut self, wait_time: std::time::Duration) {
        self.wait_time += wait_time;
    }

    /// Returns the number of calls to the database that were done through this connection
    /// since the last reset.
    pub fn call_count(&self) -> u32 {
        self.sequence_number - self.reset_base
    }

    /// Returns the number of successful statement executions since the last reset.
    pub fn execute_count(&self) -> u32 {
        self.execute_count
    }

    /// Returns the number of successful queries since the last reset.
    pub fn select_count(&self) -> u32 {
        self.select_count
    }

    /// Returns the number of failed calls since the last reset.
    pub fn error_count(&self) -> u32 {
        self.error_count
    }

    /// Returns the number of rows that were fetched since the last reset.
    pub fn fetched_rows(&self) -> u64 {
        self.fetched_rows
    }

    /// Returns the total wait time for all calls to the database that were done
    /// through this connection since the last reset.
    pub fn accumulated_wait_time(&self) -> std::time::Duration {
        self.wait_time
    }

    /// Returns the point in time when the connection was opened.
    pub fn created_at(&self) -> time::OffsetDateTime {
        self.created_at
    }

    /// Returns the point in time of the last reset.
    pub fn last_reset_at(&self) -> time::OffsetDateTime {
        self.last_reset_at
    }
}

impl std::fmt::Display for ConnectionStatistics {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "Connection statistics")?;
        writeln!(f, "Created at:     {}", self.created_at)?;
        writeln!(f, "Last reset at:  {}", self.last_reset_at)?;
        writeln!(f, "Total number of calls:    {}", self.sequence_number)?;
        writeln!(f, "Calls since last reset:   {}", self.call_count())?;
        writeln!(f, "  - executions:           {}", self.execute_count)?;
        writeln!(f, "  - queries:              {}", self.select_count)?;
        writeln!(f, "  - failed:               {}", self.error_count)?;
        writeln!(f, "Fetched rows:             {}", self.fetched_rows)?;
        writeln!(f, "Total wait time:          {:?}", self.wait_time)?;
        Ok(())
    }
}

#[cfg(test)]
mod test {
    use super::ConnectionStatistics;

    #[test]
    fn test_statistics() {
        let mut stat = ConnectionStatistics::new();
        println!("{stat}");

        stat.next_sequence_number();
        stat.add_execute();
        stat.next_sequence_number();
        stat.add_select(17);
        stat.next_sequence_number();
        stat.add_error();
        stat.add_wait_time(std::time::Duration::from_millis(3));
        println!("{stat}");
        assert_eq!(3, stat.call_count());
        assert_eq!(1, stat.execute_count());
        assert_eq!(1, stat.select_count());
        assert_eq!(1, stat.error_count());
        assert_eq!(17, stat.fetched_rows());

        std::thread::sleep(std::time::Duration::from_millis(100));
        stat.reset();
        println!("{stat}");
        assert_eq!(0, stat.call_count());
        assert_eq!(0, stat.fetched_rows());
        assert_ne!(stat.created_at, stat.last_reset_at);
        assert_eq!(4, stat.next_sequence_number());
    }
}
