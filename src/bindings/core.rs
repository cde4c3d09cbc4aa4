use crate::error::{MawError, Result};

/// What to wrap: the generated module's identity and the documentation
/// items the backend should parse into a model.
#[derive(Debug, Clone)]
pub struct ModuleSpec {
    pub package: String,
    pub module: String,
    pub name: String,
    pub docstring: String,
    pub items: Vec<String>,
}

impl ModuleSpec {
    pub fn new(
        package: impl Into<String>,
        module: impl Into<String>,
        name: impl Into<String>,
    ) -> Self {
        Self {
            package: package.into(),
            module: module.into(),
            name: name.into(),
            docstring: String::new(),
            items: Vec::new(),
        }
    }

    pub fn item(mut self, item: impl Into<String>) -> Self {
        self.items.push(item.into());
        self
    }
}

/// Documentation-derived model of the declarations to wrap, as handed back
/// by the backend's parser.
#[derive(Debug, Clone, Default)]
pub struct ModuleModel {
    pub classes: Vec<ClassDef>,
    pub typedefs: Vec<TypedefDef>,
    pub callbacks: Vec<CallbackDef>,
}

#[derive(Debug, Clone)]
pub struct ClassDef {
    pub name: String,
    pub bases: Vec<String>,
    pub methods: Vec<MethodDef>,
}

#[derive(Debug, Clone)]
pub struct MethodDef {
    pub name: String,
    pub arg_types: Vec<String>,
    pub ignored: bool,
}

#[derive(Debug, Clone)]
pub struct TypedefDef {
    pub name: String,
    pub ty: String,
    pub no_type_name: bool,
}

#[derive(Debug, Clone)]
pub struct CallbackDef {
    pub name: String,
    pub ignored: bool,
}

/// Per-module adjustments applied to the parsed model before generation.
#[derive(Debug, Clone)]
pub enum Tweak {
    /// Drop an inherited base the generated wrapper must not expose.
    RemoveBase { class: String, base: String },
    /// Skip generating a method the wrapper cannot express yet.
    IgnoreMethod { class: String, method: String },
    /// Skip a free callback declaration entirely.
    IgnoreCallback { name: String },
    /// Override a typedef's underlying type.
    RetypeTypedef {
        name: String,
        ty: String,
        no_type_name: bool,
    },
    /// Rewrite every method argument of one type to another, module-wide.
    RewriteArgType { from: String, to: String },
}

/// External code-generation backend: parses documentation into a model and
/// emits the wrapper sources from the tweaked result.
pub trait GenBackend {
    fn parse(&mut self, spec: &ModuleSpec) -> Result<ModuleModel>;
    fn apply_common_tweaks(&mut self, model: &mut ModuleModel) -> Result<()>;
    fn run_generators(&mut self, model: &ModuleModel) -> Result<()>;
}

/// One wrap target: a module spec plus its ordered tweaks. Executes once at
/// build time; there is no runtime behavior beyond applying the declaration.
#[derive(Debug, Clone)]
pub struct WrapJob {
    spec: ModuleSpec,
    tweaks: Vec<Tweak>,
}

impl WrapJob {
    pub fn new(spec: ModuleSpec) -> Self {
        Self {
            spec,
            tweaks: Vec::new(),
        }
    }

    pub fn tweak(mut self, tweak: Tweak) -> Self {
        self.tweaks.push(tweak);
        self
    }

    pub fn spec(&self) -> &ModuleSpec {
        &self.spec
    }

    pub fn tweaks(&self) -> &[Tweak] {
        &self.tweaks
    }

    /// Parse, apply this job's tweaks in declaration order, then hand the
    /// model to the backend's common tweaks and generators.
    pub fn run(&self, backend: &mut dyn GenBackend) -> Result<()> {
        let mut model = backend.parse(&self.spec)?;
        for tweak in &self.tweaks {
            apply_tweak(&mut model, tweak)?;
        }
        backend.apply_common_tweaks(&mut model)?;
        backend.run_generators(&model)
    }
}

fn apply_tweak(model: &mut ModuleModel, tweak: &Tweak) -> Result<()> {
    match tweak {
        Tweak::RemoveBase { class, base } => {
            let class_def = find_class(model, class)?;
            let before = class_def.bases.len();
            class_def.bases.retain(|b| b != base);
            if class_def.bases.len() == before {
                return Err(MawError::Binding(format!(
                    "class `{class}` has no base `{base}`"
                )));
            }
        }
        Tweak::IgnoreMethod { class, method } => {
            let class_def = find_class(model, class)?;
            let method_def = class_def
                .methods
                .iter_mut()
                .find(|m| &m.name == method)
                .ok_or_else(|| {
                    MawError::Binding(format!("class `{class}` has no method `{method}`"))
                })?;
            method_def.ignored = true;
        }
        Tweak::IgnoreCallback { name } => {
            let callback = model
                .callbacks
                .iter_mut()
                .find(|c| &c.name == name)
                .ok_or_else(|| MawError::Binding(format!("no callback `{name}` in model")))?;
            callback.ignored = true;
        }
        Tweak::RetypeTypedef {
            name,
            ty,
            no_type_name,
        } => {
            let typedef = model
                .typedefs
                .iter_mut()
                .find(|t| &t.name == name)
                .ok_or_else(|| MawError::Binding(format!("no typedef `{name}` in model")))?;
            typedef.ty = ty.clone();
            typedef.no_type_name = *no_type_name;
        }
        Tweak::RewriteArgType { from, to } => {
            for class_def in &mut model.classes {
                for method in &mut class_def.methods {
                    for arg in &mut method.arg_types {
                        if arg == from {
                            *arg = to.clone();
                        }
                    }
                }
            }
        }
    }
    Ok(())
}

fn find_class<'a>(model: &'a mut ModuleModel, name: &str) -> Result<&'a mut ClassDef> {
    model
        .classes
        .iter_mut()
        .find(|c| c.name == name)
        .ok_or_else(|| MawError::Binding(format!("no class `{name}` in model")))
}
