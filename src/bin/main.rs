//! svm-introspect command line interface
//!
//! Trains a one-vs-one model on a LibSVM file, then predicts, prints the
//! pairwise classifiers, or prints tensor coefficients of a polynomial-kernel
//! decision function.

use clap::{Args, Parser, Subcommand, ValueEnum};
use env_logger::Env;
use log::{error, info};
use serde::Serialize;
use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};
use std::process;
use svm_introspect::api::SVM;
use svm_introspect::core::{Representation, Result, SVMError, SolverConfig};
use svm_introspect::kernel::{Kernel, LinearKernel, PolynomialKernel};
use svm_introspect::model::{ClassifierView, Model};
use svm_introspect::{Dataset, LibSVMDataset, TensorIntrospector};

#[derive(Parser)]
#[command(name = "svm-introspect")]
#[command(about = "Train one-vs-one SVMs and inspect their decision functions")]
#[command(version = env!("CARGO_PKG_VERSION"))]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Enable debug output
    #[arg(short, long, global = true)]
    debug: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Train on one file and predict the samples of another
    Predict(PredictArgs),
    /// Train and print every pairwise classifier
    Inspect(InspectArgs),
    /// Train a polynomial-kernel model and print tensor coefficients
    Tensor(TensorArgs),
}

#[derive(Args, Clone, Debug)]
struct SolverArgs {
    /// Regularization parameter C
    #[arg(short = 'C', long, default_value = "1.0")]
    c: f64,

    /// Convergence tolerance
    #[arg(short, long, default_value = "0.001")]
    epsilon: f64,

    /// Maximum iterations per pair of classes
    #[arg(short, long, default_value = "10000")]
    max_iterations: usize,

    /// Kernel cache size in MB
    #[arg(long, default_value = "100")]
    cache_size: usize,

    /// Train on precomputed kernel rows instead of raw features
    #[arg(long)]
    precomputed: bool,

    /// JSON file with solver settings; replaces -C, --epsilon,
    /// --max-iterations and --cache-size
    #[arg(long)]
    config: Option<PathBuf>,

    /// Fail unless the data has exactly this many classes
    #[arg(long)]
    expected_labels: Option<usize>,
}

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq)]
enum CliKernel {
    /// K(x, y) = <x, y>
    #[value(name = "linear")]
    Linear,
    /// K(x, y) = (gamma <x, y> + coef0)^degree
    #[value(name = "polynomial")]
    Polynomial,
}

#[derive(Args, Clone, Debug)]
struct KernelArgs {
    /// Polynomial degree
    #[arg(long, default_value = "2")]
    degree: u32,

    /// Scale of the dot product (default: 1 / number of features)
    #[arg(long, allow_negative_numbers = true)]
    gamma: Option<f64>,

    /// Constant term
    #[arg(long, default_value = "0.0", allow_negative_numbers = true)]
    coef0: f64,
}

#[derive(Args)]
struct PredictArgs {
    /// Training data file (LibSVM format)
    #[arg(long)]
    train: PathBuf,

    /// Data to predict (LibSVM format)
    #[arg(long)]
    data: PathBuf,

    /// Kernel function
    #[arg(long, value_enum, default_value = "polynomial")]
    kernel: CliKernel,

    /// Print the pairwise decision values of each sample
    #[arg(long)]
    decision_values: bool,

    #[command(flatten)]
    solver: SolverArgs,

    #[command(flatten)]
    kernel_params: KernelArgs,
}

#[derive(Args)]
struct InspectArgs {
    /// Training data file (LibSVM format)
    #[arg(long)]
    train: PathBuf,

    /// Kernel function
    #[arg(long, value_enum, default_value = "polynomial")]
    kernel: CliKernel,

    #[command(flatten)]
    solver: SolverArgs,

    #[command(flatten)]
    kernel_params: KernelArgs,
}

#[derive(Args)]
struct TensorArgs {
    /// Training data file (LibSVM format)
    #[arg(long)]
    train: PathBuf,

    /// Order of the tensor
    #[arg(short, long)]
    order: usize,

    /// Comma separated 0-based feature indices of a single entry
    #[arg(long, value_delimiter = ',')]
    index: Option<Vec<usize>>,

    /// The two class labels of the classifier (required for more than two
    /// classes)
    #[arg(long, value_delimiter = ',', allow_hyphen_values = true)]
    labels: Option<Vec<f64>>,

    /// Print JSON instead of text
    #[arg(long)]
    json: bool,

    #[command(flatten)]
    solver: SolverArgs,

    #[command(flatten)]
    kernel_params: KernelArgs,
}

#[derive(Serialize)]
struct TensorReport {
    labels: (f64, f64),
    order: usize,
    prefactor: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    index: Option<Vec<usize>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    dim: Option<usize>,
    entries: Vec<f64>,
}

fn main() {
    let cli = Cli::parse();

    // Initialize logging
    let log_level = if cli.debug {
        "debug"
    } else if cli.verbose {
        "info"
    } else {
        "warn"
    };

    env_logger::Builder::from_env(Env::default().default_filter_or(log_level)).init();

    let result = match cli.command {
        Commands::Predict(args) => predict_command(args),
        Commands::Inspect(args) => inspect_command(args),
        Commands::Tensor(args) => tensor_command(args),
    };

    if let Err(e) = result {
        error!("Error: {e}");
        process::exit(1);
    }
}

fn load_dataset(path: &Path) -> Result<LibSVMDataset> {
    info!("Loading dataset from: {path:?}");
    let dataset = LibSVMDataset::from_file(path)?;
    info!(
        "Loaded {} samples with {} dimensions",
        dataset.len(),
        dataset.dim()
    );
    Ok(dataset)
}

fn solver_config(args: &SolverArgs) -> Result<SolverConfig> {
    if let Some(path) = &args.config {
        info!("Reading solver settings from: {path:?}");
        let reader = BufReader::new(File::open(path)?);
        return serde_json::from_reader(reader)
            .map_err(|e| SVMError::SerializationError(format!("{path:?}: {e}")));
    }

    Ok(SolverConfig {
        c: args.c,
        epsilon: args.epsilon,
        max_iterations: args.max_iterations,
        cache_size: args.cache_size * 1024 * 1024, // Convert MB to bytes
    })
}

fn polynomial_kernel(args: &KernelArgs, dim: usize) -> PolynomialKernel {
    let gamma = args.gamma.unwrap_or(1.0 / dim.max(1) as f64);
    PolynomialKernel::new(args.degree, gamma, args.coef0)
}

fn train<K: Kernel>(kernel: K, args: &SolverArgs, dataset: &LibSVMDataset) -> Result<Model<K>> {
    let config = solver_config(args)?;
    info!(
        "Training with {} kernel: C={}, epsilon={}, max_iter={}",
        kernel.name(),
        config.c,
        config.epsilon,
        config.max_iterations
    );

    let representation = if args.precomputed {
        Representation::Precomputed
    } else {
        Representation::Raw
    };

    let mut svm = SVM::with_kernel(kernel)
        .with_c(config.c)
        .with_epsilon(config.epsilon)
        .with_max_iterations(config.max_iterations)
        .with_cache_size(config.cache_size)
        .with_representation(representation);
    if let Some(expected) = args.expected_labels {
        svm = svm.with_expected_labels(expected);
    }

    let model = svm.train_dataset(dataset)?;
    info!(
        "Training completed: {} classes, {} support vectors",
        model.nr_class(),
        model.n_support_vectors()
    );
    Ok(model)
}

fn predict_command(args: PredictArgs) -> Result<()> {
    let training = load_dataset(&args.train)?;
    let data = load_dataset(&args.data)?;

    match args.kernel {
        CliKernel::Linear => {
            let model = train(LinearKernel::new(), &args.solver, &training)?;
            print_predictions(&model, &data, args.decision_values);
        }
        CliKernel::Polynomial => {
            let kernel = polynomial_kernel(&args.kernel_params, training.dim());
            let model = train(kernel, &args.solver, &training)?;
            print_predictions(&model, &data, args.decision_values);
        }
    }

    Ok(())
}

fn print_predictions<K: Kernel>(model: &Model<K>, data: &LibSVMDataset, decision_values: bool) {
    println!("# Predictions for {} samples", data.len());
    for (i, sample) in data.samples().iter().enumerate() {
        let prediction = model.predict(&sample.features);
        if decision_values {
            let values: Vec<String> = prediction
                .decision_values
                .iter()
                .map(|v| format!("{v:.6}"))
                .collect();
            println!("{} {} {}", i, prediction.label, values.join(" "));
        } else {
            println!("{} {}", i, prediction.label);
        }
    }
    println!("Accuracy: {:.2}%", model.evaluate(data) * 100.0);
}

fn inspect_command(args: InspectArgs) -> Result<()> {
    let training = load_dataset(&args.train)?;

    match args.kernel {
        CliKernel::Linear => {
            let model = train(LinearKernel::new(), &args.solver, &training)?;
            print_model(&model);
        }
        CliKernel::Polynomial => {
            let kernel = polynomial_kernel(&args.kernel_params, training.dim());
            let model = train(kernel, &args.solver, &training)?;
            print_model(&model);
        }
    }

    Ok(())
}

fn print_model<K: Kernel>(model: &Model<K>) {
    println!("=== Model ===");
    println!("Kernel: {}", model.kernel().name());
    println!("Labels: {:?}", model.labels());
    println!("Support vectors per class: {:?}", model.n_sv());

    for view in model.classifiers() {
        let (a, b) = view.labels();
        println!("\nClassifier {a} vs {b} (rho = {:.6})", view.rho());

        let mut cursor = view.begin();
        while let Some((coef, sv)) = cursor.get() {
            let features: Vec<String> = sv
                .input()
                .indices
                .iter()
                .zip(&sv.input().values)
                .map(|(i, v)| format!("{}:{}", i + 1, v))
                .collect();
            println!(
                "  [{}] {:+.6}  {}",
                model.support_vector_indices()[cursor.sv_position()],
                coef,
                features.join(" ")
            );
            cursor.move_next();
        }
    }
}

fn select_classifier<'a>(
    model: &'a Model<PolynomialKernel>,
    labels: Option<&[f64]>,
) -> Result<ClassifierView<'a>> {
    match labels {
        None => model.binary_classifier(),
        Some(&[a, b]) => model.classifier(a, b),
        Some(other) => Err(SVMError::InvalidParameter(format!(
            "--labels takes exactly two labels, got {}",
            other.len()
        ))),
    }
}

fn tensor_command(args: TensorArgs) -> Result<()> {
    let training = load_dataset(&args.train)?;
    let kernel = polynomial_kernel(&args.kernel_params, training.dim());
    let model = train(kernel, &args.solver, &training)?;

    let view = select_classifier(&model, args.labels.as_deref())?;
    let introspector = TensorIntrospector::new(view, model.kernel(), args.order)?;

    let report = match args.index {
        Some(index) => TensorReport {
            labels: view.labels(),
            order: introspector.order(),
            prefactor: introspector.prefactor(),
            entries: vec![introspector.tensor(&index)?],
            index: Some(index),
            dim: None,
        },
        None => {
            let dense = introspector.materialize(model.dim())?;
            TensorReport {
                labels: view.labels(),
                order: dense.order(),
                prefactor: introspector.prefactor(),
                index: None,
                dim: Some(dense.dim()),
                entries: dense.as_slice().to_vec(),
            }
        }
    };

    if args.json {
        let json = serde_json::to_string_pretty(&report)
            .map_err(|e| SVMError::SerializationError(e.to_string()))?;
        println!("{json}");
    } else {
        print_report(&report);
    }

    Ok(())
}

fn print_report(report: &TensorReport) {
    println!(
        "Classifier {} vs {}, order {} (prefactor {})",
        report.labels.0, report.labels.1, report.order, report.prefactor
    );
    match (&report.index, report.dim) {
        (Some(index), _) => println!("T{:?} = {}", index, report.entries[0]),
        (None, Some(dim)) if report.order >= 1 => {
            // Last index varies fastest; one line per leading multi-index
            let rows: Vec<String> = report
                .entries
                .chunks(dim.max(1))
                .map(|row| {
                    row.iter()
                        .map(|v| format!("{v:.6}"))
                        .collect::<Vec<_>>()
                        .join(" ")
                })
                .collect();
            for row in rows {
                println!("{row}");
            }
        }
        _ => {
            for entry in &report.entries {
                println!("{entry:.6}");
            }
        }
    }
}
