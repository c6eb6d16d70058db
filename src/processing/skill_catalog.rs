//! Deterministic skill detection over a fixed, categorized vocabulary

use crate::error::{Result, ResumeMatchError};
use crate::processing::skill_set::SkillSet;
use aho_corasick::{AhoCorasick, MatchKind};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SkillCategory {
    ProgrammingLanguage,
    Framework,
    Database,
    CloudInfrastructure,
    ContinuousIntegration,
    Frontend,
    DataScience,
    SoftSkill,
    Methodology,
    SystemsTooling,
    Productivity,
}

impl SkillCategory {
    pub const ALL: [SkillCategory; 11] = [
        SkillCategory::ProgrammingLanguage,
        SkillCategory::Framework,
        SkillCategory::Database,
        SkillCategory::CloudInfrastructure,
        SkillCategory::ContinuousIntegration,
        SkillCategory::Frontend,
        SkillCategory::DataScience,
        SkillCategory::SoftSkill,
        SkillCategory::Methodology,
        SkillCategory::SystemsTooling,
        SkillCategory::Productivity,
    ];

    /// Parse a loose category name such as "databases" or "soft-skills".
    pub fn parse(name: &str) -> Option<Self> {
        let key: String = name
            .chars()
            .filter(|c| c.is_ascii_alphanumeric())
            .collect::<String>()
            .to_lowercase();
        let category = match key.as_str() {
            "language" | "languages" | "programminglanguages" => SkillCategory::ProgrammingLanguage,
            "framework" | "frameworks" | "libraries" => SkillCategory::Framework,
            "database" | "databases" | "db" => SkillCategory::Database,
            "cloud" | "infra" | "infrastructure" => SkillCategory::CloudInfrastructure,
            "ci" | "cicd" => SkillCategory::ContinuousIntegration,
            "frontend" => SkillCategory::Frontend,
            "datascience" | "ml" | "machinelearning" => SkillCategory::DataScience,
            "soft" | "softskills" => SkillCategory::SoftSkill,
            "methodology" | "methodologies" => SkillCategory::Methodology,
            "os" | "shell" | "iac" | "systems" => SkillCategory::SystemsTooling,
            "productivity" | "tools" => SkillCategory::Productivity,
            _ => return None,
        };
        Some(category)
    }
}

impl fmt::Display for SkillCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            SkillCategory::ProgrammingLanguage => "Programming Languages",
            SkillCategory::Framework => "Frameworks & Libraries",
            SkillCategory::Database => "Databases",
            SkillCategory::CloudInfrastructure => "Cloud & Infrastructure",
            SkillCategory::ContinuousIntegration => "CI/CD",
            SkillCategory::Frontend => "Frontend",
            SkillCategory::DataScience => "Data Science & ML",
            SkillCategory::SoftSkill => "Soft Skills",
            SkillCategory::Methodology => "Methodologies",
            SkillCategory::SystemsTooling => "OS, Shell & IaC",
            SkillCategory::Productivity => "Productivity Tools",
        };
        write!(f, "{}", name)
    }
}

struct CatalogEntry {
    name: &'static str,
    category: SkillCategory,
    aliases: &'static [&'static str],
}

const fn entry(
    name: &'static str,
    category: SkillCategory,
    aliases: &'static [&'static str],
) -> CatalogEntry {
    CatalogEntry { name, category, aliases }
}

use SkillCategory::*;

const CATALOG: &[CatalogEntry] = &[
    // Programming languages
    entry("Python", ProgrammingLanguage, &["python"]),
    entry("JavaScript", ProgrammingLanguage, &["javascript", "ecmascript"]),
    entry("TypeScript", ProgrammingLanguage, &["typescript"]),
    entry("Java", ProgrammingLanguage, &["java"]),
    entry("C++", ProgrammingLanguage, &["c++", "cpp"]),
    entry("C#", ProgrammingLanguage, &["c#", "csharp"]),
    entry("Golang", ProgrammingLanguage, &["golang"]),
    entry("Rust", ProgrammingLanguage, &["rust"]),
    entry("Ruby", ProgrammingLanguage, &["ruby"]),
    entry("PHP", ProgrammingLanguage, &["php"]),
    entry("Swift", ProgrammingLanguage, &["swift"]),
    entry("Kotlin", ProgrammingLanguage, &["kotlin"]),
    entry("Scala", ProgrammingLanguage, &["scala"]),
    entry("Haskell", ProgrammingLanguage, &["haskell"]),
    entry("Elixir", ProgrammingLanguage, &["elixir"]),
    entry("MATLAB", ProgrammingLanguage, &["matlab"]),
    entry("Perl", ProgrammingLanguage, &["perl"]),
    entry("SQL", ProgrammingLanguage, &["sql"]),
    // Frameworks and libraries
    entry("Django", Framework, &["django"]),
    entry("Flask", Framework, &["flask"]),
    entry("FastAPI", Framework, &["fastapi"]),
    entry("Spring Boot", Framework, &["spring boot", "springboot"]),
    entry("Ruby on Rails", Framework, &["ruby on rails", "rails"]),
    entry("Laravel", Framework, &["laravel"]),
    entry("Express.js", Framework, &["express.js", "expressjs"]),
    entry("Node.js", Framework, &["node.js", "nodejs"]),
    entry(".NET", Framework, &[".net", "dotnet"]),
    entry("ASP.NET", Framework, &["asp.net"]),
    entry("Actix", Framework, &["actix"]),
    entry("Axum", Framework, &["axum"]),
    entry("Tokio", Framework, &["tokio"]),
    entry("GraphQL", Framework, &["graphql"]),
    entry("gRPC", Framework, &["grpc"]),
    entry("REST APIs", Framework, &["rest api", "rest apis", "restful"]),
    entry("Microservices", Framework, &["microservices", "microservice"]),
    // Databases
    entry("PostgreSQL", Database, &["postgresql", "postgres"]),
    entry("MySQL", Database, &["mysql"]),
    entry("SQLite", Database, &["sqlite"]),
    entry("MongoDB", Database, &["mongodb", "mongo"]),
    entry("Redis", Database, &["redis"]),
    entry("Cassandra", Database, &["cassandra"]),
    entry("DynamoDB", Database, &["dynamodb"]),
    entry("Elasticsearch", Database, &["elasticsearch"]),
    entry("Oracle", Database, &["oracle"]),
    entry("SQL Server", Database, &["sql server", "mssql"]),
    entry("MariaDB", Database, &["mariadb"]),
    entry("Neo4j", Database, &["neo4j"]),
    // Cloud and infrastructure
    entry("AWS", CloudInfrastructure, &["aws", "amazon web services"]),
    entry("Azure", CloudInfrastructure, &["azure"]),
    entry("GCP", CloudInfrastructure, &["gcp", "google cloud"]),
    entry("Docker", CloudInfrastructure, &["docker"]),
    entry("Kubernetes", CloudInfrastructure, &["kubernetes", "k8s"]),
    entry("Helm", CloudInfrastructure, &["helm"]),
    entry("Nginx", CloudInfrastructure, &["nginx"]),
    entry("Kafka", CloudInfrastructure, &["kafka"]),
    entry("RabbitMQ", CloudInfrastructure, &["rabbitmq"]),
    entry("Prometheus", CloudInfrastructure, &["prometheus"]),
    entry("Grafana", CloudInfrastructure, &["grafana"]),
    entry("Heroku", CloudInfrastructure, &["heroku"]),
    // CI/CD
    entry("CI/CD", ContinuousIntegration, &["ci/cd", "cicd", "continuous integration"]),
    entry("Jenkins", ContinuousIntegration, &["jenkins"]),
    entry("GitHub Actions", ContinuousIntegration, &["github actions"]),
    entry("GitLab CI", ContinuousIntegration, &["gitlab ci"]),
    entry("CircleCI", ContinuousIntegration, &["circleci"]),
    entry("Travis CI", ContinuousIntegration, &["travis ci", "travisci"]),
    entry("Git", ContinuousIntegration, &["git"]),
    entry("GitHub", ContinuousIntegration, &["github"]),
    entry("GitLab", ContinuousIntegration, &["gitlab"]),
    // Frontend
    entry("React", Frontend, &["react", "reactjs", "react.js"]),
    entry("Angular", Frontend, &["angular", "angularjs"]),
    entry("Vue.js", Frontend, &["vue", "vue.js", "vuejs"]),
    entry("Svelte", Frontend, &["svelte"]),
    entry("Next.js", Frontend, &["next.js", "nextjs"]),
    entry("HTML", Frontend, &["html", "html5"]),
    entry("CSS", Frontend, &["css", "css3"]),
    entry("Sass", Frontend, &["sass", "scss"]),
    entry("Tailwind CSS", Frontend, &["tailwind", "tailwindcss"]),
    entry("Bootstrap", Frontend, &["bootstrap"]),
    entry("jQuery", Frontend, &["jquery"]),
    entry("Redux", Frontend, &["redux"]),
    entry("Webpack", Frontend, &["webpack"]),
    entry("Vite", Frontend, &["vite"]),
    entry("Jest", Frontend, &["jest"]),
    entry("Cypress", Frontend, &["cypress"]),
    // Data science and ML
    entry("Machine Learning", DataScience, &["machine learning"]),
    entry("Deep Learning", DataScience, &["deep learning"]),
    entry("Data Science", DataScience, &["data science"]),
    entry("TensorFlow", DataScience, &["tensorflow"]),
    entry("PyTorch", DataScience, &["pytorch"]),
    entry("Keras", DataScience, &["keras"]),
    entry("Scikit-learn", DataScience, &["scikit-learn", "sklearn", "scikit learn"]),
    entry("Pandas", DataScience, &["pandas"]),
    entry("NumPy", DataScience, &["numpy"]),
    entry("Jupyter", DataScience, &["jupyter"]),
    entry("Apache Spark", DataScience, &["apache spark", "pyspark", "spark"]),
    entry("Hadoop", DataScience, &["hadoop"]),
    entry("Airflow", DataScience, &["airflow"]),
    entry("NLP", DataScience, &["nlp", "natural language processing"]),
    // Soft skills
    entry("Leadership", SoftSkill, &["leadership"]),
    entry("Communication", SoftSkill, &["communication"]),
    entry("Teamwork", SoftSkill, &["teamwork"]),
    entry("Collaboration", SoftSkill, &["collaboration", "collaborative"]),
    entry("Problem Solving", SoftSkill, &["problem solving", "problem-solving"]),
    entry("Critical Thinking", SoftSkill, &["critical thinking"]),
    entry("Mentoring", SoftSkill, &["mentoring", "mentorship"]),
    entry("Time Management", SoftSkill, &["time management"]),
    entry("Project Management", SoftSkill, &["project management"]),
    entry("Stakeholder Management", SoftSkill, &["stakeholder management"]),
    entry("Presentation", SoftSkill, &["presentation skills", "public speaking"]),
    // Methodologies
    entry("Agile", Methodology, &["agile"]),
    entry("Scrum", Methodology, &["scrum"]),
    entry("Kanban", Methodology, &["kanban"]),
    entry("Waterfall", Methodology, &["waterfall"]),
    entry("TDD", Methodology, &["tdd", "test-driven development", "test driven development"]),
    entry("DevOps", Methodology, &["devops"]),
    entry("Code Review", Methodology, &["code review", "code reviews"]),
    // OS, shell and infrastructure as code
    entry("Linux", SystemsTooling, &["linux", "ubuntu", "centos", "debian"]),
    entry("Unix", SystemsTooling, &["unix"]),
    entry("Windows", SystemsTooling, &["windows"]),
    entry("macOS", SystemsTooling, &["macos"]),
    entry("Bash", SystemsTooling, &["bash", "shell scripting"]),
    entry("PowerShell", SystemsTooling, &["powershell"]),
    entry("Terraform", SystemsTooling, &["terraform"]),
    entry("Ansible", SystemsTooling, &["ansible"]),
    entry("Puppet", SystemsTooling, &["puppet"]),
    entry("CloudFormation", SystemsTooling, &["cloudformation"]),
    // Productivity tools
    entry("Jira", Productivity, &["jira"]),
    entry("Confluence", Productivity, &["confluence"]),
    entry("Slack", Productivity, &["slack"]),
    entry("Trello", Productivity, &["trello"]),
    entry("Figma", Productivity, &["figma"]),
    entry("Excel", Productivity, &["excel", "microsoft excel"]),
    entry("Tableau", Productivity, &["tableau"]),
    entry("Power BI", Productivity, &["power bi", "powerbi"]),
    entry("Postman", Productivity, &["postman"]),
    entry("VS Code", Productivity, &["vs code", "vscode", "visual studio code"]),
];

/// Pattern-based skill detector. Matching is ASCII case-insensitive and a
/// hit only counts when it is not embedded in a longer word.
pub struct SkillCatalogMatcher {
    automaton: AhoCorasick,
    /// Catalog index for each automaton pattern
    pattern_entries: Vec<usize>,
    lookup: HashMap<String, usize>,
}

impl SkillCatalogMatcher {
    pub fn new() -> Result<Self> {
        let mut patterns = Vec::new();
        let mut pattern_entries = Vec::new();
        let mut lookup = HashMap::new();

        for (index, entry) in CATALOG.iter().enumerate() {
            lookup.insert(entry.name.to_lowercase(), index);
            for alias in entry.aliases {
                patterns.push(*alias);
                pattern_entries.push(index);
                lookup.entry(alias.to_lowercase()).or_insert(index);
            }
        }

        let automaton = AhoCorasick::builder()
            .ascii_case_insensitive(true)
            .match_kind(MatchKind::Standard)
            .build(&patterns)
            .map_err(|e| ResumeMatchError::Processing(format!("Failed to build skill catalog: {}", e)))?;

        Ok(Self {
            automaton,
            pattern_entries,
            lookup,
        })
    }

    /// Distinct catalog skills appearing in `text`, by first occurrence.
    pub fn match_text(&self, text: &str) -> SkillSet {
        let mut hits: Vec<(usize, usize)> = self
            .automaton
            .find_overlapping_iter(text)
            .filter(|m| Self::is_word_bounded(text, m.start(), m.end()))
            .map(|m| (m.start(), self.pattern_entries[m.pattern().as_usize()]))
            .collect();

        hits.sort_by_key(|(start, _)| *start);
        hits.into_iter().map(|(_, index)| CATALOG[index].name).collect()
    }

    fn is_word_bounded(text: &str, start: usize, end: usize) -> bool {
        let is_word_char = |c: char| c.is_alphanumeric() || c == '_';
        let before_ok = text[..start].chars().next_back().map_or(true, |c| !is_word_char(c));
        let after_ok = text[end..].chars().next().map_or(true, |c| !is_word_char(c));
        before_ok && after_ok
    }

    /// Category of a skill by canonical name or alias, case-insensitively.
    pub fn category_of(&self, skill: &str) -> Option<SkillCategory> {
        self.lookup
            .get(&skill.trim().to_lowercase())
            .map(|index| CATALOG[*index].category)
    }

    /// Canonical names in one category, in catalog order.
    pub fn skills_in(&self, category: SkillCategory) -> Vec<&'static str> {
        CATALOG
            .iter()
            .filter(|entry| entry.category == category)
            .map(|entry| entry.name)
            .collect()
    }

    pub fn skill_count(&self) -> usize {
        CATALOG.len()
    }
}
