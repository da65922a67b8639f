//! Single GPIO lines backed by gpiocdev requests
//!
//! Each line owns its own request, so releasing a line gives the offset back
//! to the kernel independently of the others.

use crate::error::{LinuxGpioError, Result};

use bitspi_core::{InputLine, Line, OutputLine};
use gpiocdev::line::{Offset, Value};
use gpiocdev::request::{Config, Request};

const CONSUMER: &str = "bitspi";

fn request(path: &str, line: Line, offset: Offset, config: Config) -> Result<Request> {
    Request::from_config(config)
        .on_chip(path)
        .with_consumer(CONSUMER)
        .request()
        .map_err(|source| LinuxGpioError::LineRequestFailed {
            line,
            offset,
            path: path.to_string(),
            source,
        })
}

/// Output line on a GPIO chip
pub struct GpioOutput {
    request: Request,
    offset: Offset,
    line: Line,
}

impl GpioOutput {
    /// Request `offset` on `path` as an output, starting at `initial`
    pub fn open(path: &str, line: Line, offset: Offset, initial: bool) -> Result<Self> {
        let mut config = Config::default();
        config.with_line(offset).as_output(level(initial));

        let request = request(path, line, offset, config)?;
        log::debug!("linux_gpio: {} on {} offset {}", line, path, offset);

        Ok(Self {
            request,
            offset,
            line,
        })
    }
}

impl OutputLine for GpioOutput {
    fn set(&mut self, high: bool) {
        if let Err(e) = self.request.set_value(self.offset, level(high)) {
            log::error!("Failed to set {}: {}", self.line, e);
        }
    }

    fn release(self) {
        log::debug!("linux_gpio: releasing {} (offset {})", self.line, self.offset);
        drop(self.request);
    }
}

/// Input line on a GPIO chip
pub struct GpioInput {
    request: Request,
    offset: Offset,
}

impl GpioInput {
    /// Request `offset` on `path` as an input
    pub fn open(path: &str, offset: Offset) -> Result<Self> {
        let mut config = Config::default();
        config.with_line(offset).as_input();

        let request = request(path, Line::DataIn, offset, config)?;
        log::debug!("linux_gpio: {} on {} offset {}", Line::DataIn, path, offset);

        Ok(Self { request, offset })
    }
}

impl InputLine for GpioInput {
    fn get(&mut self) -> bool {
        match self.request.value(self.offset) {
            Ok(Value::Active) => true,
            Ok(Value::Inactive) => false,
            Err(e) => {
                log::error!("Failed to get {}: {}", Line::DataIn, e);
                false
            }
        }
    }

    fn release(self) {
        log::debug!(
            "linux_gpio: releasing {} (offset {})",
            Line::DataIn,
            self.offset
        );
        drop(self.request);
    }
}

fn level(high: bool) -> Value {
    if high {
        Value::Active
    } else {
        Value::Inactive
    }
}
