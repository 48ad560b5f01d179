use crate::domain::model::RawInputs;
use crate::domain::ports::InputSource;
use crate::utils::error::Result;
use std::io::{BufRead, Write};

/// Interactive prompts on a line-oriented reader/writer pair, normally stdin/stdout.
pub struct ConsoleInput<R: BufRead, W: Write> {
    reader: R,
    writer: W,
}

impl<R: BufRead, W: Write> ConsoleInput<R, W> {
    pub fn new(reader: R, writer: W) -> Self {
        Self { reader, writer }
    }

    fn ask(&mut self, label: &str) -> Result<Option<String>> {
        write!(self.writer, "{}", label)?;
        self.writer.flush()?;

        let mut line = String::new();
        // EOF 當作空白回答
        if self.reader.read_line(&mut line)? == 0 {
            writeln!(self.writer)?;
            return Ok(None);
        }

        let answer = line.trim();
        if answer.is_empty() {
            Ok(None)
        } else {
            Ok(Some(answer.to_string()))
        }
    }

    fn ask_if_missing(&mut self, slot: &mut Option<String>, label: &str) -> Result<()> {
        if slot.is_none() {
            *slot = self.ask(label)?;
        }
        Ok(())
    }

    pub fn into_inner(self) -> (R, W) {
        (self.reader, self.writer)
    }
}

impl ConsoleInput<std::io::StdinLock<'static>, std::io::Stdout> {
    pub fn stdio() -> Self {
        Self::new(std::io::stdin().lock(), std::io::stdout())
    }
}

impl<R: BufRead, W: Write> InputSource for ConsoleInput<R, W> {
    fn collect(&mut self, given: RawInputs) -> Result<RawInputs> {
        let mut inputs = given;

        self.ask_if_missing(&mut inputs.annual_income, "Annual income (e.g., 120000): ")?;
        self.ask_if_missing(&mut inputs.monthly_debt, "Monthly debt (e.g., 600): ")?;
        self.ask_if_missing(
            &mut inputs.home_price,
            "Home price of interest (e.g., 420000): ",
        )?;
        self.ask_if_missing(&mut inputs.annual_rate_percent, "Interest rate (e.g., 6.5): ")?;
        self.ask_if_missing(
            &mut inputs.term_years,
            "Mortgage term in years (e.g., 30): ",
        )?;

        Ok(inputs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    #[test]
    fn test_collects_answers_in_order() {
        let answers = "95000\n250\n310000\n5.5\n15\n";
        let mut console = ConsoleInput::new(Cursor::new(answers), Vec::new());

        let inputs = console.collect(RawInputs::default()).unwrap();
        assert_eq!(inputs.annual_income.as_deref(), Some("95000"));
        assert_eq!(inputs.monthly_debt.as_deref(), Some("250"));
        assert_eq!(inputs.home_price.as_deref(), Some("310000"));
        assert_eq!(inputs.annual_rate_percent.as_deref(), Some("5.5"));
        assert_eq!(inputs.term_years.as_deref(), Some("15"));
        assert_eq!(inputs.dti_limit, None);

        let (_, output) = console.into_inner();
        let output = String::from_utf8(output).unwrap();
        assert!(output.starts_with("Annual income (e.g., 120000): "));
        assert!(output.contains("Mortgage term in years (e.g., 30): "));
    }

    #[test]
    fn test_blank_answers_and_eof_stay_empty() {
        let mut console = ConsoleInput::new(Cursor::new("\n  \n"), Vec::new());
        let inputs = console.collect(RawInputs::default()).unwrap();
        assert_eq!(inputs, RawInputs::default());
    }

    #[test]
    fn test_skips_fields_already_given() {
        let given = RawInputs {
            annual_income: Some("80000".to_string()),
            home_price: Some("250000".to_string()),
            ..Default::default()
        };
        let mut console = ConsoleInput::new(Cursor::new("400\n7\n20\n"), Vec::new());

        let inputs = console.collect(given).unwrap();
        assert_eq!(inputs.annual_income.as_deref(), Some("80000"));
        assert_eq!(inputs.monthly_debt.as_deref(), Some("400"));
        assert_eq!(inputs.home_price.as_deref(), Some("250000"));
        assert_eq!(inputs.annual_rate_percent.as_deref(), Some("7"));
        assert_eq!(inputs.term_years.as_deref(), Some("20"));

        let (_, output) = console.into_inner();
        let output = String::from_utf8(output).unwrap();
        assert!(!output.contains("Annual income"));
        assert!(!output.contains("Home price"));
    }
}
