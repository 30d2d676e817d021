use core::fmt::{self, Write};
use log::debug;
use crate::console::Console;
use crate::constants::shell::{CALC_INPUT_LEN, MAX_POWER, MENU_INPUT_LEN};
use crate::hardware::Hardware;
use crate::input::InputReader;

/// Screens of the menu application
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum State {
    MainMenu,
    About,
    CalculatorMenu,
    CalculatorResult(i32),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    Add,
    Subtract,
    Divide,
    Multiply,
    Power,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CalcError {
    InvalidNumber,
    DivisionByZero,
    InvalidPower,
    Overflow,
}

impl fmt::Display for CalcError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CalcError::InvalidNumber => f.write_str("Error: Not a number!"),
            CalcError::DivisionByZero => f.write_str("Error: Division by zero!"),
            CalcError::InvalidPower => f.write_str("Error: Power too large or invalid."),
            CalcError::Overflow => f.write_str("Error: Result out of range!"),
        }
    }
}

impl Operation {
    /// Parse a calculator menu choice, either case.
    pub fn from_choice(choice: &str) -> Option<Operation> {
        match choice {
            "a" | "A" => Some(Operation::Add),
            "b" | "B" => Some(Operation::Subtract),
            "c" | "C" => Some(Operation::Divide),
            "d" | "D" => Some(Operation::Multiply),
            "e" | "E" => Some(Operation::Power),
            _ => None,
        }
    }

    /// Screen heading and the labels of the two operand prompts
    fn prompts(self) -> (&'static str, &'static str, &'static str) {
        match self {
            Operation::Add => ("\nADDITION\n\n", "num1:\n", "       +\nnum2:\n"),
            Operation::Subtract => ("\nSUBTRACTION\n\n", "num1:\n", "       -\nnum2:\n"),
            Operation::Divide => ("\nDIVISION\n\n", "num1:\n", "       /\nnum2:\n"),
            Operation::Multiply => ("\nMULTIPLICATION\n\n", "num1:\n", "       *\nnum2:\n"),
            Operation::Power => (
                "\nSquare, Cube or any power\n\n",
                "Select the number:\n",
                "Select the power:\n",
            ),
        }
    }

    pub fn apply(self, lhs: i32, rhs: i32) -> Result<i32, CalcError> {
        match self {
            Operation::Add => lhs.checked_add(rhs).ok_or(CalcError::Overflow),
            Operation::Subtract => lhs.checked_sub(rhs).ok_or(CalcError::Overflow),
            Operation::Multiply => lhs.checked_mul(rhs).ok_or(CalcError::Overflow),
            Operation::Divide => {
                if rhs == 0 {
                    return Err(CalcError::DivisionByZero);
                }
                lhs.checked_div(rhs).ok_or(CalcError::Overflow)
            }
            Operation::Power => {
                if !(0..=MAX_POWER).contains(&rhs) {
                    return Err(CalcError::InvalidPower);
                }
                lhs.checked_pow(rhs as u32).ok_or(CalcError::Overflow)
            }
        }
    }
}

fn parse_operand(text: &str) -> Result<i32, CalcError> {
    text.trim().parse::<i32>().map_err(|_| CalcError::InvalidNumber)
}

/// Menu / calculator application driven one screen at a time.
pub struct Shell<H: Hardware> {
    console: Console<H>,
    input: InputReader,
    state: State,
    previous_result: i32,
}

impl<H: Hardware> Shell<H> {
    pub fn new(console: Console<H>) -> Self {
        Shell {
            console,
            input: InputReader::new(),
            state: State::MainMenu,
            previous_result: 0,
        }
    }

    pub fn state(&self) -> State {
        self.state
    }

    pub fn previous_result(&self) -> i32 {
        self.previous_result
    }

    pub fn console(&self) -> &Console<H> {
        &self.console
    }

    pub fn console_mut(&mut self) -> &mut Console<H> {
        &mut self.console
    }

    pub fn run(&mut self) -> ! {
        loop {
            self.step();
        }
    }

    /// Show the current screen, consume its input and move to the next state.
    pub fn step(&mut self) -> State {
        let next = match self.state {
            State::MainMenu => self.main_menu(),
            State::About => self.about(),
            State::CalculatorMenu => self.calculator_menu(),
            State::CalculatorResult(value) => self.calculator_result(value),
        };
        if next != self.state {
            debug!("shell: {:?} -> {:?}", self.state, next);
        }
        self.state = next;
        next
    }

    fn wait_for_key(&mut self) {
        self.input.read_key(&mut self.console);
    }

    fn main_menu(&mut self) -> State {
        let console = &mut self.console;
        console.clear();
        console.print(concat!("                               ", env!("CARGO_PKG_NAME"), "\n"));
        console.print("-------------------------------------------------------------------------------\n");
        console.print("\n");
        console.print("    ---------------          ---------------\n");
        console.print("\n");
        console.print("           ?                      2+2=4\n");
        console.print("\n");
        console.print("    ---------------          ---------------\n");
        console.print("\n");
        console.print("   About (Press 'a')      Calculator (Press 'c')\n");
        console.print("\n");
        console.print("Enter your choice:\n");

        let mut buffer = [0u8; MENU_INPUT_LEN];
        match self.input.read_line(&mut self.console, &mut buffer) {
            "a" | "about" => State::About,
            "c" | "calc" => State::CalculatorMenu,
            _ => {
                self.console.print("\nThis is not recognized. Try again!\n");
                self.console.print("Press any key to continue...");
                self.wait_for_key();
                State::MainMenu
            }
        }
    }

    fn about(&mut self) -> State {
        let console = &mut self.console;
        console.clear();
        console.print("                                      About\n");
        console.print("-------------------------------------------------------------------------------\n");
        console.print(concat!("  ", env!("CARGO_PKG_NAME"), " v", env!("CARGO_PKG_VERSION"), "\n"));
        console.print("  Polled VGA text console with a line editor\n");
        console.print("\nPress 'b' to go back to the main menu.\n");

        let mut buffer = [0u8; MENU_INPUT_LEN];
        match self.input.read_line(&mut self.console, &mut buffer) {
            "b" => State::MainMenu,
            _ => {
                self.console.print("\nInvalid input. Press 'b' to go back.");
                self.wait_for_key();
                State::About
            }
        }
    }

    fn calculator_menu(&mut self) -> State {
        let previous = self.previous_result;
        let console = &mut self.console;
        console.clear();
        console.print("                                     Calculator\n");
        console.print("-------------------------------------------------------------------------------\n\n");
        console.print("/////////////////////////////////////\n");
        // Console::write_str never fails
        let _ = write!(console, "Your previous calculated number was {}", previous);
        console.print("\n/////////////////////////////////////\n\n");
        console.print("Enter the specified letter to continue..\n\n");
        console.print("a) Addition\n");
        console.print("b) Subtraction\n");
        console.print("c) Division\n");
        console.print("d) Multiplication\n");
        console.print("e) Square, Cube or any power\n");
        console.print("exit) Exits\n\n");
        console.print("Choice:\n");

        let mut buffer = [0u8; CALC_INPUT_LEN];
        let choice = self.input.read_line(&mut self.console, &mut buffer);
        if choice == "exit" {
            return State::MainMenu;
        }
        let operation = match Operation::from_choice(choice) {
            Some(operation) => operation,
            None => {
                self.console.print("\nInvalid value. Press any key to try again...\n");
                self.wait_for_key();
                return State::CalculatorMenu;
            }
        };

        match self.calculate(operation) {
            Ok(value) => State::CalculatorResult(value),
            Err(err) => {
                let _ = writeln!(self.console, "{}", err);
                self.console.print("Press any key to continue...");
                self.wait_for_key();
                State::CalculatorMenu
            }
        }
    }

    fn calculate(&mut self, operation: Operation) -> Result<i32, CalcError> {
        let (heading, first, second) = operation.prompts();
        self.console.print(heading);
        self.console.print(first);
        let lhs = self.read_operand();
        self.console.print(second);
        let rhs = self.read_operand();
        operation.apply(lhs?, rhs?)
    }

    fn read_operand(&mut self) -> Result<i32, CalcError> {
        let mut buffer = [0u8; CALC_INPUT_LEN];
        parse_operand(self.input.read_line(&mut self.console, &mut buffer))
    }

    fn calculator_result(&mut self, value: i32) -> State {
        self.previous_result = value;
        let _ = writeln!(self.console, "\n------------\n{}", value);
        self.console.print("\nPress any key to return to menu...");
        self.wait_for_key();
        State::CalculatorMenu
    }
}
