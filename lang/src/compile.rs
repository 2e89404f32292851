//! Compilation of parsed statements to code objects.

use std::collections::HashMap;
use std::rc::Rc;

use codec::{CodeObject, CodeRef, Constant, Instr};

use crate::error::LangResult;
use crate::parse::{parse, BodyKind, BodyStatement, StatementKind, Term};

/// Compiles source text into a module code object named `filename`.
///
/// Top-level assignments and `def`s bind globals. Names assigned inside a
/// function body are locals of that function; every other name it reads is
/// a global.
pub fn compile(source: &str, filename: &str) -> LangResult<CodeObject> {
    let statements = parse(source)?;
    let mut module = Builder::new(filename, 1);

    for statement in statements {
        match statement.kind {
            StatementKind::Assign { name, value } => {
                let constant = module.int_const(value);
                module.emit(Instr::LoadConst(constant));
                let name = module.name(&name);
                module.emit(Instr::StoreName(name));
            }
            StatementKind::Def { name, body } => {
                let function = compile_function(&name, statement.line, &body);
                let constant = module.code_const(function);
                module.emit(Instr::LoadConst(constant));
                module.emit(Instr::MakeFunction);
                let name = module.name(&name);
                module.emit(Instr::StoreName(name));
            }
            StatementKind::Call { name } => {
                let name = module.name(&name);
                module.emit(Instr::LoadName(name));
                module.emit(Instr::Call);
                module.emit(Instr::Pop);
            }
        }
    }

    let none = module.none_const();
    module.emit(Instr::LoadConst(none));
    module.emit(Instr::Return);
    Ok(module.finish())
}

fn compile_function(name: &str, line: usize, body: &[BodyStatement]) -> CodeObject {
    let mut function = Builder::new(name, line as u32);

    // Locals are every name assigned anywhere in the body.
    for statement in body {
        if let BodyKind::Assign { name, .. } = &statement.kind {
            function.local(name);
        }
    }

    let mut returned = false;
    for statement in body {
        match &statement.kind {
            BodyKind::Assign { name, value } => {
                let constant = function.int_const(*value);
                function.emit(Instr::LoadConst(constant));
                let slot = function.local(name);
                function.emit(Instr::StoreFast(slot));
            }
            BodyKind::Return(terms) => {
                if terms.is_empty() {
                    let none = function.none_const();
                    function.emit(Instr::LoadConst(none));
                }
                for (index, term) in terms.iter().enumerate() {
                    let load = match term {
                        Term::Int(value) => Instr::LoadConst(function.int_const(*value)),
                        Term::Name(name) => function.load(name),
                    };
                    function.emit(load);
                    if index > 0 {
                        function.emit(Instr::Add);
                    }
                }
                function.emit(Instr::Return);
                returned = true;
            }
        }
    }

    if !returned {
        let none = function.none_const();
        function.emit(Instr::LoadConst(none));
        function.emit(Instr::Return);
    }
    function.finish()
}

/// Accumulates one code object, interning constants and names.
struct Builder {
    code: CodeObject,
    ints: HashMap<i64, u32>,
    none: Option<u32>,
    names: HashMap<Rc<str>, u32>,
    locals: HashMap<Rc<str>, u32>,
}

impl Builder {
    fn new(name: &str, first_line: u32) -> Self {
        Self {
            code: CodeObject::new(name, first_line),
            ints: HashMap::new(),
            none: None,
            names: HashMap::new(),
            locals: HashMap::new(),
        }
    }

    fn emit(&mut self, instr: Instr) {
        self.code.code.push(instr);
    }

    fn push_const(&mut self, constant: Constant) -> u32 {
        let index = self.code.consts.len() as u32;
        self.code.consts.push(constant);
        index
    }

    fn int_const(&mut self, value: i64) -> u32 {
        if let Some(&index) = self.ints.get(&value) {
            return index;
        }
        let index = self.push_const(Constant::Int(value));
        self.ints.insert(value, index);
        index
    }

    fn none_const(&mut self) -> u32 {
        if let Some(index) = self.none {
            return index;
        }
        let index = self.push_const(Constant::None);
        self.none = Some(index);
        index
    }

    fn code_const(&mut self, code: CodeObject) -> u32 {
        self.push_const(Constant::Code(CodeRef::ready(code)))
    }

    fn name(&mut self, name: &str) -> u32 {
        intern(&mut self.code.names, &mut self.names, name)
    }

    fn local(&mut self, name: &str) -> u32 {
        intern(&mut self.code.locals, &mut self.locals, name)
    }

    fn load(&mut self, name: &str) -> Instr {
        if let Some(&slot) = self.locals.get(name) {
            return Instr::LoadFast(slot);
        }
        Instr::LoadName(self.name(name))
    }

    fn finish(self) -> CodeObject {
        self.code
    }
}

fn intern(table: &mut Vec<Rc<str>>, index: &mut HashMap<Rc<str>, u32>, name: &str) -> u32 {
    if let Some(&slot) = index.get(name) {
        return slot;
    }
    let slot = table.len() as u32;
    let name: Rc<str> = Rc::from(name);
    table.push(Rc::clone(&name));
    index.insert(name, slot);
    slot
}
