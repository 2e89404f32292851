//! The interpreter loop.

use std::rc::Rc;

use codec::{CodeObject, Constant, Instr, Module};

use crate::context::Context;
use crate::error::{VmError, VmResult};
use crate::value::{Function, Value};

/// Executes a module's top-level code in `context`.
///
/// Functions called during execution are materialized through their code
/// handles, so under lazy loading the first call pays the decode cost.
pub fn execute(module: &Module, context: &mut Context) -> VmResult<Value> {
    let mut machine = Machine { context, depth: 0 };
    machine.run(module.code())
}

struct Machine<'a> {
    context: &'a mut Context,
    depth: usize,
}

struct Frame<'c> {
    code: &'c CodeObject,
    stack: Vec<Value>,
    locals: Vec<Option<Value>>,
    max_stack: usize,
}

impl<'c> Frame<'c> {
    fn new(code: &'c CodeObject, max_stack: usize) -> Self {
        Self {
            code,
            stack: Vec::new(),
            locals: vec![None; code.locals.len()],
            max_stack,
        }
    }

    fn push(&mut self, value: Value) -> VmResult<()> {
        if self.stack.len() >= self.max_stack {
            return Err(VmError::StackOverflow {
                limit: self.max_stack,
            });
        }
        self.stack.push(value);
        Ok(())
    }

    fn pop(&mut self, instr: Instr) -> VmResult<Value> {
        self.stack.pop().ok_or(VmError::StackUnderflow {
            instr: instr.mnemonic(),
        })
    }

    fn name(&self, instr: Instr, index: u32) -> VmResult<&'c Rc<str>> {
        self.code
            .names
            .get(index as usize)
            .ok_or(VmError::InvalidOperand {
                instr: instr.mnemonic(),
                operand: index,
            })
    }

    fn local_name(&self, index: u32) -> String {
        self.code
            .locals
            .get(index as usize)
            .map_or_else(|| format!("#{index}"), ToString::to_string)
    }
}

impl Machine<'_> {
    fn run(&mut self, code: &CodeObject) -> VmResult<Value> {
        let mut frame = Frame::new(code, self.context.limits().max_stack);

        for &instr in &code.code {
            match instr {
                Instr::LoadConst(index) => {
                    let value = match code.consts.get(index as usize) {
                        Some(Constant::None) => Value::None,
                        Some(Constant::Int(value)) => Value::Int(*value),
                        Some(Constant::Code(nested)) => Value::Code(nested.clone()),
                        None => {
                            return Err(VmError::InvalidOperand {
                                instr: instr.mnemonic(),
                                operand: index,
                            })
                        }
                    };
                    frame.push(value)?;
                }
                Instr::LoadName(index) => {
                    let name = frame.name(instr, index)?;
                    let value = self
                        .context
                        .get(name)
                        .cloned()
                        .ok_or_else(|| VmError::UnboundName {
                            name: name.to_string(),
                        })?;
                    frame.push(value)?;
                }
                Instr::StoreName(index) => {
                    let name = Rc::clone(frame.name(instr, index)?);
                    let value = frame.pop(instr)?;
                    self.context.set(name, value);
                }
                Instr::LoadFast(index) => {
                    let value = frame
                        .locals
                        .get(index as usize)
                        .ok_or(VmError::InvalidOperand {
                            instr: instr.mnemonic(),
                            operand: index,
                        })?
                        .clone()
                        .ok_or_else(|| VmError::UnboundLocal {
                            name: frame.local_name(index),
                        })?;
                    frame.push(value)?;
                }
                Instr::StoreFast(index) => {
                    let value = frame.pop(instr)?;
                    let slot = frame.locals.get_mut(index as usize).ok_or(
                        VmError::InvalidOperand {
                            instr: instr.mnemonic(),
                            operand: index,
                        },
                    )?;
                    *slot = Some(value);
                }
                Instr::Add => {
                    let right = frame.pop(instr)?;
                    let left = frame.pop(instr)?;
                    let sum = int(instr, &left)?
                        .checked_add(int(instr, &right)?)
                        .ok_or(VmError::IntegerOverflow)?;
                    frame.push(Value::Int(sum))?;
                }
                Instr::MakeFunction => match frame.pop(instr)? {
                    Value::Code(code) => {
                        frame.push(Value::Function(Rc::new(Function { code })))?;
                    }
                    other => return Err(mismatch(instr, "code", &other)),
                },
                Instr::Call => {
                    let callee = match frame.pop(instr)? {
                        Value::Function(function) => function,
                        other => return Err(mismatch(instr, "function", &other)),
                    };
                    let result = self.call(&callee)?;
                    frame.push(result)?;
                }
                Instr::Pop => {
                    frame.pop(instr)?;
                }
                Instr::Return => return frame.pop(instr),
            }
        }

        Err(VmError::MissingReturn {
            function: code.name.to_string(),
        })
    }

    fn call(&mut self, function: &Function) -> VmResult<Value> {
        let limit = self.context.limits().max_call_depth;
        if self.depth >= limit {
            return Err(VmError::CallDepthExceeded { limit });
        }
        let code = function.code.get()?;
        self.depth += 1;
        let result = self.run(code);
        self.depth -= 1;
        result
    }
}

fn int(instr: Instr, value: &Value) -> VmResult<i64> {
    value.as_int().ok_or_else(|| mismatch(instr, "int", value))
}

fn mismatch(instr: Instr, expected: &'static str, found: &Value) -> VmError {
    VmError::TypeMismatch {
        instr: instr.mnemonic(),
        expected,
        found: found.type_name(),
    }
}
