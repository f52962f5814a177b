//! Built-in question banks.
//!
//! These guarantee the app is useful without any external config: six
//! quiz subjects with ten questions each, and three tiered skill tracks
//! with three self-assessment questions each. Extra subjects can be layered
//! on top through the TOML config (see `config.rs`).

use crate::domain::{QuizQuestion, SkillLevel, SkillOption, SkillQuestion};

#[derive(Clone, Copy)]
struct QuizQuestionDef {
    prompt: &'static str,
    options: &'static [&'static str],
    answer: &'static str,
    topic: &'static str,
}

#[derive(Clone, Copy)]
struct SkillQuestionDef {
    id: u32,
    prompt: &'static str,
    // Option texts in beginner / intermediate / advanced order.
    beginner: &'static str,
    intermediate: &'static str,
    advanced: &'static str,
}

macro_rules! q {
    ($prompt:expr, [$($opt:expr),+ $(,)?], $answer:expr, $topic:expr) => {
        QuizQuestionDef {
            prompt: $prompt,
            options: &[$($opt),+],
            answer: $answer,
            topic: $topic,
        }
    };
}

macro_rules! sq {
    ($id:expr, $prompt:expr, $beginner:expr, $intermediate:expr, $advanced:expr) => {
        SkillQuestionDef {
            id: $id,
            prompt: $prompt,
            beginner: $beginner,
            intermediate: $intermediate,
            advanced: $advanced,
        }
    };
}

const MACHINE_LEARNING: &[QuizQuestionDef] = &[
    q!("What is the goal of a loss function?", ["Minimize error", "Maximize features", "Speed up training", "Normalize data"], "Minimize error", "Fundamentals"),
    q!("Which algorithm is non-parametric?", ["Linear Regression", "Logistic Regression", "k-Nearest Neighbors (k-NN)", "Support Vector Machines"], "k-Nearest Neighbors (k-NN)", "Algorithm Types"),
    q!("What does 'Bias' in ML refer to?", ["Model's ability to fit complex data", "Error due to overly simple assumptions", "Amount of noise in the data", "Model's variance"], "Error due to overly simple assumptions", "Model Evaluation"),
    q!("What is backpropagation used for?", ["Feature selection", "Weight adjustment", "Data normalization", "Activation function"], "Weight adjustment", "Neural Networks"),
    q!("Which metric is best for imbalanced datasets?", ["Accuracy", "Precision", "Recall", "F1-Score"], "F1-Score", "Model Evaluation"),
    q!("What is the primary purpose of a validation set?", ["Training the model", "Testing the final model", "Tuning hyperparameters", "Data cleaning"], "Tuning hyperparameters", "Model Evaluation"),
    q!("In Python, which library is typically used for ML?", ["Numpy", "Pandas", "Scikit-learn", "Matplotlib"], "Scikit-learn", "Libraries"),
    q!("What is 'Overfitting'?", ["Model fits training data too well", "Model is too simple", "Model is too slow", "Data is noisy"], "Model fits training data too well", "Concepts"),
    q!("What is an activation function used for in a neural network?", ["Calculating input sum", "Introducing non-linearity", "Normalizing weights", "Preventing overfitting"], "Introducing non-linearity", "Neural Networks"),
    q!("Which type of learning involves no labeled data?", ["Supervised", "Reinforcement", "Unsupervised", "Semi-Supervised"], "Unsupervised", "Learning Types"),
];

const MATHEMATICS: &[QuizQuestionDef] = &[
    q!("What is the derivative of $x^2$?", ["x", "2x", "$x^3/3$", "2"], "2x", "Calculus"),
    q!("The dot product of two orthogonal vectors is always:", ["1", "Their magnitude product", "0", "Undefined"], "0", "Linear Algebra"),
    q!("What is the result of $2^0$?", ["2", "1", "0", "Undefined"], "1", "Algebra"),
    q!("In statistics, what measures the spread of data?", ["Mean", "Median", "Mode", "Standard Deviation"], "Standard Deviation", "Statistics"),
    q!("What is the integral of 1 with respect to x?", ["0", "1", "x + C", "$x^2$"], "x + C", "Calculus"),
    q!("What type of matrix is equal to its own transpose?", ["Diagonal", "Identity", "Symmetric", "Skew-Symmetric"], "Symmetric", "Linear Algebra"),
    q!("A rational number can be written as a fraction $\\frac{p}{q}$ where $q$ is not:", ["1", "Prime", "0", "Negative"], "0", "Number Theory"),
    q!("The sum of angles in a triangle is (in degrees):", ["90", "180", "270", "360"], "180", "Geometry"),
    q!("What is the logarithm base 10 of 100?", ["1", "10", "2", "0"], "2", "Logarithms"),
    q!("If $f(x) = 3x + 1$, what is $f(2)$?", ["3", "7", "10", "5"], "7", "Functions"),
];

const ARTIFICIAL_INTELLIGENCE: &[QuizQuestionDef] = &[
    q!("What is a heuristic function in AI search?", ["A search strategy", "A greedy algorithm", "An evaluation function", "A probability distribution"], "An evaluation function", "Search Algorithms"),
    q!("Turing test assesses a machine's ability to:", ["Compute numbers", "Learn from data", "Exhibit intelligent behavior", "Pass security checks"], "Exhibit intelligent behavior", "Fundamentals"),
    q!("What is the state space in an AI problem?", ["All possible states and actions", "The final goal state", "The initial state", "The set of all agents"], "All possible states and actions", "Problem Solving"),
    q!("Which AI field deals with uncertainty and probability?", ["Logic programming", "Knowledge representation", "Bayesian networks", "Robotics"], "Bayesian networks", "Uncertainty"),
    q!("What does NLP stand for?", ["Natural Language Planning", "Neural Logic Processing", "Natural Language Processing", "Network Layer Protocol"], "Natural Language Processing", "Fields"),
    q!("What is the main challenge of the 'Frame Problem'?", ["Vision processing speed", "Deciding what changes and what stays the same", "Generating natural speech", "Training large models"], "Deciding what changes and what stays the same", "Logic & Planning"),
    q!("Which search algorithm always finds the shortest path?", ["Depth-First Search", "Breadth-First Search", "Hill Climbing", "A* Search"], "A* Search", "Search Algorithms"),
    q!("An AI agent that makes decisions based only on the current percept is:", ["Goal-based", "Utility-based", "Simple Reflex", "Learning"], "Simple Reflex", "Agents"),
    q!("Which AI concept deals with making optimal sequential decisions?", ["Constraint satisfaction", "Reinforcement Learning", "Fuzzy Logic", "Expert Systems"], "Reinforcement Learning", "Learning Types"),
    q!("In AI, an 'Expert System' mimics the decision-making of a:", ["Robot", "Human expert", "Computer network", "Database"], "Human expert", "Applications"),
];

const FLA: &[QuizQuestionDef] = &[
    q!("What does a Regular Expression define?", ["Context-free grammar", "Regular language", "Turing machine", "Pushdown automaton"], "Regular language", "Regular Languages"),
    q!("What is the simplest type of automaton?", ["Pushdown Automaton", "Linear Bounded Automaton", "Turing Machine", "Finite Automaton"], "Finite Automaton", "Automata Theory"),
    q!("Context-Free Languages are accepted by which machine?", ["Finite Automaton", "Turing Machine", "Pushdown Automaton", "Linear Bounded Automaton"], "Pushdown Automaton", "Language Hierarchy"),
    q!("The Chomsky Hierarchy ranks languages based on:", ["Size", "Complexity of Grammar", "Speed of recognition", "Alphabet size"], "Complexity of Grammar", "Chomsky Hierarchy"),
    q!("A language accepted by a Turing Machine is called:", ["Context-Free", "Recursive", "Regular", "Context-Sensitive"], "Recursive", "Turing Machines"),
    q!("What is the role of a 'stack' in a Pushdown Automaton (PDA)?", ["Finite memory", "Infinite tape", "Extra temporary memory", "Input tape"], "Extra temporary memory", "PDA"),
    q!("If a language is regular, is it also context-free?", ["Always", "Never", "Sometimes", "Only if deterministic"], "Always", "Language Hierarchy"),
    q!("Which type of automaton is used to recognize C-like programming languages?", ["Finite Automaton", "Turing Machine", "Linear Bounded Automaton", "Pushdown Automaton"], "Pushdown Automaton", "Applications"),
    q!("What is a 'string' in Formal Language theory?", ["A file", "A sequence of symbols from an alphabet", "A list of states", "A set of rules"], "A sequence of symbols from an alphabet", "Fundamentals"),
    q!("The transition function $\\delta$ in an NFA can map to:", ["Only one state", "Multiple states", "No state", "Only the final state"], "Multiple states", "NFA/DFA"),
];

const INFORMATION_STORAGE: &[QuizQuestionDef] = &[
    q!("RAID 0 offers:", ["Redundancy", "Stripping", "Mirroring", "Parity"], "Stripping", "Storage Basics"),
    q!("Which RAID level involves mirroring?", ["RAID 0", "RAID 1", "RAID 5", "RAID 6"], "RAID 1", "RAID"),
    q!("The primary purpose of deduplication is to:", ["Increase write speed", "Reduce storage space", "Improve latency", "Enhance security"], "Reduce storage space", "Data Management"),
    q!("SAN typically uses which protocol?", ["NFS", "SMB", "iSCSI/Fibre Channel", "HTTP"], "iSCSI/Fibre Channel", "Networked Storage"),
    q!("NAS provides storage at the:", ["Block level", "Byte level", "File level", "Database level"], "File level", "Networked Storage"),
    q!("What term describes the time taken to find a specific track on a disk?", ["Rotational Latency", "Seek Time", "Transfer Rate", "Throughput"], "Seek Time", "Disk Technology"),
    q!("In a hierarchical storage management system, what is the fastest tier?", ["Tape", "Cloud", "Solid State Drive (SSD)", "Hard Disk Drive (HDD)"], "Solid State Drive (SSD)", "Storage Tiers"),
    q!("Data archival is primarily focused on:", ["High availability", "Long-term retention and compliance", "Fast access", "High performance"], "Long-term retention and compliance", "Backup & Recovery"),
    q!("Which type of storage is volatile (loses data when power is off)?", ["HDD", "SSD", "RAM", "CD-ROM"], "RAM", "Memory Basics"),
    q!("What is a major advantage of object storage?", ["Fast random access", "File locking", "Scalability and metadata handling", "Compatibility with legacy OS"], "Scalability and metadata handling", "Storage Types"),
];

const COMPUTER_NETWORK: &[QuizQuestionDef] = &[
    q!("Which layer is responsible for logical addressing (IP)?", ["Physical", "Data Link", "Network", "Transport"], "Network", "OSI Model"),
    q!("TCP operates at which layer of the OSI model?", ["Network", "Data Link", "Application", "Transport"], "Transport", "OSI Model"),
    q!("What device connects different networks and uses IP addresses?", ["Hub", "Switch", "Repeater", "Router"], "Router", "Devices"),
    q!("What is the primary function of DNS?", ["Encryption", "Translating domain names to IP addresses", "Routing packets", "Managing network traffic"], "Translating domain names to IP addresses", "Protocols"),
    q!("What is the standard port for HTTP?", ["21", "23", "80", "443"], "80", "Protocols"),
    q!("MAC address is used at which layer?", ["Physical", "Data Link", "Network", "Transport"], "Data Link", "Addressing"),
    q!("What does the acronym DHCP stand for?", ["Data Host Control Protocol", "Dynamic Host Configuration Protocol", "Domain Host Control Process", "Digital Handshake Protocol"], "Dynamic Host Configuration Protocol", "Protocols"),
    q!("Collision detection is a key feature of which protocol?", ["CSMA/CD (Ethernet)", "Token Ring", "FDDI", "CDMA"], "CSMA/CD (Ethernet)", "Access Methods"),
    q!("What is the maximum number of bits in an IPv4 address?", ["16", "32", "64", "128"], "32", "Addressing"),
    q!("What is the goal of subnetting?", ["Increase network speed", "Decrease latency", "Improve security and manageability", "Replace routers"], "Improve security and manageability", "IP Subnetting"),
];

const QUIZ_BANKS: &[(&str, &[QuizQuestionDef])] = &[
    ("Machine Learning", MACHINE_LEARNING),
    ("Mathematics", MATHEMATICS),
    ("Artificial Intelligence", ARTIFICIAL_INTELLIGENCE),
    ("FLA", FLA),
    ("Information Storage and Management", INFORMATION_STORAGE),
    ("Computer Network", COMPUTER_NETWORK),
];

const DSA_TRACK: &[SkillQuestionDef] = &[
    sq!(1, "How would you find the time complexity of an algorithm?",
        "I don't know what time complexity is.",
        "I use Big O notation, but I struggle with recursion.",
        "I can analyze iterative and recursive functions using Big O, Omega, and Theta."),
    sq!(2, "Which of these data structures do you feel most comfortable with?",
        "Arrays and basic lists.",
        "Stacks, Queues, Linked Lists, and Hash Maps.",
        "Trees (AVL, Red-Black), Heaps, and Graphs."),
    sq!(3, "What is your experience with sorting algorithms?",
        "I only know simple sorts like Bubble Sort.",
        "I can implement Merge Sort and Quick Sort.",
        "I understand their complexities, stability, and can apply them appropriately."),
];

const WEBDEV_TRACK: &[SkillQuestionDef] = &[
    sq!(1, "What is your experience with JavaScript (or a similar frontend language)?",
        "I can write basic scripts to change HTML content.",
        "I understand DOM manipulation and asynchronous operations (Promises).",
        "I master modern features, state management, and have built a multi-page app."),
    sq!(2, "Which of these best describes your CSS skills?",
        "I use basic selectors and inline styles.",
        "I can use Flexbox and/or Grid for responsive layouts.",
        "I utilize preprocessors (SASS/LESS) or utility frameworks (Tailwind) and understand animations."),
    sq!(3, "How familiar are you with backend concepts (APIs, Databases)?",
        "I only know what they are in theory.",
        "I can consume REST APIs and perform basic CRUD operations.",
        "I can design a schema, build a secure RESTful API, and manage authentication."),
];

const ML_TRACK: &[SkillQuestionDef] = &[
    sq!(1, "What is your experience with model training and evaluation?",
        "I can load a dataset but struggle to choose a model.",
        "I can train basic models (Linear/Logistic Regression) and use metrics like Accuracy and F1-Score.",
        "I regularly use Cross-Validation, interpret ROC/AUC, and tune hyper-parameters effectively."),
    sq!(2, "Which ML paradigm are you most comfortable implementing?",
        "Basic supervised learning tasks like prediction.",
        "Supervised and basic unsupervised (K-Means, PCA).",
        "Deep Learning (CNNs/RNNs/Transformers) and Reinforcement Learning."),
    sq!(3, "How do you handle data preprocessing and feature engineering?",
        "I mostly use raw data and sometimes handle missing values.",
        "I use techniques like scaling/normalization and one-hot encoding.",
        "I can design complex features, handle class imbalance, and manage time-series data."),
];

const SKILL_TRACKS: &[(&str, &str, &[SkillQuestionDef])] = &[
    ("dsa", "Data Structures & Algorithms", DSA_TRACK),
    ("webdev", "Web Development", WEBDEV_TRACK),
    ("ml", "Machine Learning", ML_TRACK),
];

/// Names of the built-in quiz subjects, in presentation order.
pub fn quiz_subjects() -> Vec<&'static str> {
    QUIZ_BANKS.iter().map(|(name, _)| *name).collect()
}

/// The full bank for a quiz subject, or None for an unknown subject.
pub fn quiz_bank(subject: &str) -> Option<Vec<QuizQuestion>> {
    let (_, defs) = QUIZ_BANKS.iter().find(|(name, _)| *name == subject)?;
    Some(defs.iter().map(to_quiz_question).collect())
}

/// (key, display name) of each built-in skill track.
pub fn skill_tracks() -> Vec<(&'static str, &'static str)> {
    SKILL_TRACKS
        .iter()
        .map(|(key, display, _)| (*key, *display))
        .collect()
}

/// Display name plus questions for a skill track key (e.g. "dsa").
pub fn skill_bank(key: &str) -> Option<(&'static str, Vec<SkillQuestion>)> {
    let (_, display, defs) = SKILL_TRACKS.iter().find(|(k, _, _)| *k == key)?;
    Some((display, defs.iter().map(to_skill_question).collect()))
}

fn to_quiz_question(def: &QuizQuestionDef) -> QuizQuestion {
    QuizQuestion {
        prompt: def.prompt.to_string(),
        options: def.options.iter().map(|o| o.to_string()).collect(),
        answer: def.answer.to_string(),
        topic: def.topic.to_string(),
    }
}

fn to_skill_question(def: &SkillQuestionDef) -> SkillQuestion {
    SkillQuestion {
        id: def.id,
        prompt: def.prompt.to_string(),
        options: vec![
            SkillOption { text: def.beginner.to_string(), level: SkillLevel::Beginner },
            SkillOption { text: def.intermediate.to_string(), level: SkillLevel::Intermediate },
            SkillOption { text: def.advanced.to_string(), level: SkillLevel::Advanced },
        ],
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::session::QUESTIONS_PER_QUIZ;

    #[test]
    fn every_quiz_bank_is_well_formed() {
        for subject in quiz_subjects() {
            let bank = quiz_bank(subject).expect("bank");
            assert!(bank.len() >= QUESTIONS_PER_QUIZ, "{subject} bank too small");
            for question in &bank {
                assert!(question.options.len() >= 2, "{subject}: '{}' lacks options", question.prompt);
                assert!(
                    question.options.contains(&question.answer),
                    "{subject}: answer '{}' is not an option of '{}'",
                    question.answer,
                    question.prompt
                );
                assert!(!question.topic.is_empty());
            }
        }
    }

    #[test]
    fn every_skill_track_covers_all_three_levels() {
        for (key, _display) in skill_tracks() {
            let (_, questions) = skill_bank(key).expect("track");
            assert_eq!(questions.len(), 3, "{key} track should have 3 questions");
            for question in &questions {
                let mut levels: Vec<_> =
                    question.options.iter().map(|o| o.level).collect();
                levels.dedup();
                assert_eq!(levels.len(), 3, "{key} q{} misses a level", question.id);
            }
        }
    }

    #[test]
    fn unknown_subject_has_no_bank() {
        assert!(quiz_bank("Underwater Basket Weaving").is_none());
        assert!(skill_bank("quantum").is_none());
    }
}
