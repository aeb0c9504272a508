//! Renders VM commands as text lines, one instruction per call, mirroring
//! the shape [`vmtranslate`] itself consumes downstream.

pub fn push(segment: &str, index: u16) -> String {
    format!("push {} {}", segment, index)
}

pub fn pop(segment: &str, index: u16) -> String {
    format!("pop {} {}", segment, index)
}

pub fn arithmetic(command: &str) -> String {
    command.to_string()
}

pub fn label(name: &str) -> String {
    format!("label {}", name)
}

pub fn goto(name: &str) -> String {
    format!("goto {}", name)
}

pub fn if_goto(name: &str) -> String {
    format!("if-goto {}", name)
}

pub fn call(name: &str, n_args: u16) -> String {
    format!("call {} {}", name, n_args)
}

pub fn function(name: &str, n_locals: u16) -> String {
    format!("function {} {}", name, n_locals)
}

pub fn ret() -> String {
    "return".to_string()
}
