/*
 * SPDX-License-Identifier: Apache-2.0
 * Copyright 2023-2025 ByteDance and/or its affiliates.
 */

use std::fmt;
use std::io::{self, IsTerminal, Write};

use chrono::Local;
use slog::{Drain, KV, Level, OwnedKVList, Record};

const TIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S%.6f";

/// A slog drain which writes one line per record to stderr or stdout.
///
/// Colors are only used when the output is a terminal.
pub struct StdLogDrain {
    use_stdout: bool,
    append_code_position: bool,
}

impl StdLogDrain {
    pub fn new(append_code_position: bool, use_stdout: bool) -> Self {
        StdLogDrain {
            use_stdout,
            append_code_position,
        }
    }

    fn write_record<IO: Write>(
        &self,
        io: &mut IO,
        console: bool,
        record: &Record,
        values: &OwnedKVList,
    ) -> io::Result<()> {
        let mut kv = KvCollector::default();
        let _ = record.kv().serialize(record, &mut kv);
        let _ = values.serialize(record, &mut kv);

        let datetime = Local::now();
        write!(io, "{}", datetime.format(TIME_FORMAT))?;

        if console {
            let style = level_style(record.level());
            write!(io, " {}{}{}", style.render(), record.level(), style.render_reset())?;
        } else {
            write!(io, " {}", record.level())?;
        }

        for (k, v) in &kv.pairs {
            write!(io, " {k}={v},")?;
        }

        let message = record.msg().to_string();
        if message.is_empty() {
            write!(io, " ()")?;
        } else {
            write!(io, " {message}")?;
        }

        if self.append_code_position {
            write!(io, " <{}:{}>", record.file(), record.line())?;
        }
        writeln!(io)?;
        io.flush()
    }
}

impl Drain for StdLogDrain {
    type Ok = ();
    type Err = io::Error;

    fn log(&self, record: &Record, values: &OwnedKVList) -> Result<Self::Ok, Self::Err> {
        if self.use_stdout {
            let stdout = io::stdout();
            let console = stdout.is_terminal();
            self.write_record(&mut stdout.lock(), console, record, values)
        } else {
            let stderr = io::stderr();
            let console = stderr.is_terminal();
            self.write_record(&mut stderr.lock(), console, record, values)
        }
    }
}

fn level_style(level: Level) -> anstyle::Style {
    use anstyle::{AnsiColor, Color, Style};

    let color = match level {
        Level::Critical => AnsiColor::Magenta,
        Level::Error => AnsiColor::Red,
        Level::Warning => AnsiColor::Yellow,
        Level::Info => AnsiColor::Green,
        Level::Debug => AnsiColor::Cyan,
        Level::Trace => AnsiColor::Blue,
    };
    Style::new().fg_color(Some(Color::Ansi(color)))
}

#[derive(Default)]
struct KvCollector {
    pairs: Vec<(String, String)>,
}

impl slog::Serializer for KvCollector {
    fn emit_arguments(&mut self, key: slog::Key, val: &fmt::Arguments) -> slog::Result {
        self.pairs.push((key.to_string(), val.to_string()));
        Ok(())
    }
}
