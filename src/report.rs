//! Per-file summary of everything the scanners find, printable as text or
//! serializable as JSON.

use std::fmt;
use std::path::{Path, PathBuf};

use serde::Serialize;

use crate::scanner::{
    ClassInfo, ConstantRecord, IncludeRecord, MemberRecord, ParameterRecord, PropertyRecord,
    ScanResult, StructuralRecord, TokenArrayScanner, UseStatement,
};

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FileReport {
    pub path: Option<PathBuf>,
    pub namespaces: Vec<String>,
    pub uses: Vec<UseStatement>,
    pub includes: Vec<IncludeRecord>,
    pub classes: Vec<ClassReport>,
    pub functions: Vec<FunctionReport>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ClassReport {
    #[serde(flatten)]
    pub info: ClassInfo,
    pub constants: Vec<ConstantRecord>,
    pub properties: Vec<PropertyRecord>,
    pub methods: Vec<MemberRecord>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FunctionReport {
    /// Namespace-qualified name.
    pub qualified_name: String,
    pub member: MemberRecord,
}

impl FileReport {
    /// Run every scanner over the file. An empty token stream yields an
    /// empty report.
    pub fn build(scanner: &TokenArrayScanner<'_>, path: Option<&Path>) -> ScanResult<Self> {
        let mut report = FileReport {
            path: path.map(Path::to_path_buf),
            namespaces: Vec::new(),
            uses: Vec::new(),
            includes: Vec::new(),
            classes: Vec::new(),
            functions: Vec::new(),
        };
        if scanner.is_empty() {
            return Ok(report);
        }

        for record in scanner.records()? {
            match record {
                StructuralRecord::Namespace(namespace) => report
                    .namespaces
                    .push(namespace.name.clone().unwrap_or_default()),
                StructuralRecord::Use(use_record) => {
                    report.uses.extend(use_record.statements.iter().cloned());
                }
                StructuralRecord::Include(include) => report.includes.push(include.clone()),
                StructuralRecord::ClassLike(_) | StructuralRecord::Function(_) => {}
            }
        }

        for class in scanner.classes()? {
            report.classes.push(ClassReport {
                info: class.info()?.clone(),
                constants: class
                    .constants()?
                    .iter()
                    .map(|constant| constant.record().cloned())
                    .collect::<ScanResult<_>>()?,
                properties: class
                    .properties()?
                    .iter()
                    .map(|property| property.record().cloned())
                    .collect::<ScanResult<_>>()?,
                methods: class
                    .methods()?
                    .iter()
                    .map(|method| method.record().cloned())
                    .collect::<ScanResult<_>>()?,
            });
        }

        let names = scanner.function_names()?;
        for (name, function) in names.into_iter().zip(scanner.functions()?) {
            report.functions.push(FunctionReport {
                qualified_name: name.to_string(),
                member: function.record()?.clone(),
            });
        }

        Ok(report)
    }
}

impl fmt::Display for FileReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.path {
            Some(path) => writeln!(f, "{}", path.display())?,
            None => writeln!(f, "<source>")?,
        }
        for namespace in &self.namespaces {
            if namespace.is_empty() {
                writeln!(f, "  namespace (global)")?;
            } else {
                writeln!(f, "  namespace {namespace}")?;
            }
        }
        for statement in &self.uses {
            match &statement.alias {
                Some(alias) => writeln!(f, "  use {} as {alias}", statement.import)?,
                None => writeln!(f, "  use {}", statement.import)?,
            }
        }
        for include in &self.includes {
            writeln!(f, "  {} {}", include.kind.as_str(), include.path)?;
        }
        for class in &self.classes {
            write!(f, "{class}")?;
        }
        for function in &self.functions {
            let member = &function.member;
            writeln!(
                f,
                "  function {}({}){} lines {}-{}",
                function.qualified_name,
                Parameters(&member.parameters),
                ReturnType(member.return_type.as_deref()),
                member.line_range.start,
                member.line_range.end,
            )?;
        }
        Ok(())
    }
}

impl fmt::Display for ClassReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let info = &self.info;
        write!(f, "  {} {}", info.kind.as_str(), info.name)?;
        if let Some(parent) = &info.parent_class {
            write!(f, " extends {parent}")?;
        }
        if !info.interfaces.is_empty() {
            write!(f, " implements {}", info.interfaces.join(", "))?;
        }
        if info.is_final {
            write!(f, " [final]")?;
        }
        if info.is_abstract {
            write!(f, " [abstract]")?;
        }
        if info.truncated {
            write!(f, " [truncated]")?;
        }
        writeln!(f, " lines {}-{}", info.line_range.start, info.line_range.end)?;

        for trait_use in &info.trait_uses {
            writeln!(f, "    use {}", trait_use.traits.join(", "))?;
        }
        for constant in &self.constants {
            match &constant.value {
                Some(value) => writeln!(f, "    const {} = {value}", constant.name)?,
                None => writeln!(f, "    const {}", constant.name)?,
            }
        }
        for property in &self.properties {
            write!(f, "    {}", property.visibility.as_str())?;
            if property.is_static {
                write!(f, " static")?;
            }
            if property.is_readonly {
                write!(f, " readonly")?;
            }
            write!(f, " ${}", property.name)?;
            if let Some(type_hint) = &property.type_hint {
                write!(f, ": {type_hint}")?;
            }
            if let Some(default) = &property.default_value {
                write!(f, " = {default}")?;
            }
            writeln!(f)?;
        }
        for method in &self.methods {
            write!(f, "    {}", method.visibility.as_str())?;
            if method.is_static {
                write!(f, " static")?;
            }
            if method.is_abstract {
                write!(f, " abstract")?;
            }
            if method.is_final {
                write!(f, " final")?;
            }
            writeln!(
                f,
                " function {}({}){} lines {}-{}",
                method.name,
                Parameters(&method.parameters),
                ReturnType(method.return_type.as_deref()),
                method.line_range.start,
                method.line_range.end,
            )?;
        }
        Ok(())
    }
}

struct Parameters<'a>(&'a [ParameterRecord]);

impl fmt::Display for Parameters<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (index, parameter) in self.0.iter().enumerate() {
            if index > 0 {
                write!(f, ", ")?;
            }
            if let Some(type_hint) = &parameter.type_hint {
                if parameter.is_nullable {
                    write!(f, "?")?;
                }
                write!(f, "{type_hint} ")?;
            }
            if parameter.is_passed_by_reference {
                write!(f, "&")?;
            }
            if parameter.is_variadic {
                write!(f, "...")?;
            }
            write!(f, "${}", parameter.name)?;
            if let Some(default) = &parameter.default_value {
                write!(f, " = {default}")?;
            }
        }
        Ok(())
    }
}

struct ReturnType<'a>(Option<&'a str>);

impl fmt::Display for ReturnType<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.0 {
            Some(return_type) => write!(f, ": {return_type}"),
            None => Ok(()),
        }
    }
}
