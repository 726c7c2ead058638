use console::{style, StyledObject};

pub fn name<T>(name: T) -> StyledObject<T> {
    style(name).bold().green()
}

pub fn address<T>(addr: T) -> StyledObject<T> {
    style(addr).magenta()
}

pub fn network<T>(network: T) -> StyledObject<T> {
    style(network).cyan().dim()
}

pub fn path<T>(path: T) -> StyledObject<T> {
    style(path).blue().dim()
}

pub fn warning<T>(msg: T) -> StyledObject<T> {
    style(msg).yellow().bold()
}
