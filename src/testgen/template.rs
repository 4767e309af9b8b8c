//! template.rs
//!
//! Static template resolution for a chosen suggestion.
//!
//! This is a lookup, not a synthesis engine: every framework tag maps
//! to a fixed scaffold, file-name extension and dependency list, and
//! unknown tags take the Jest defaults. The contract is "always returns
//! an artifact" — the wizard has no recovery path for a resolution
//! failure, so nothing here may fail.

use crate::testgen::suggestion::SuggestionDescriptor;

/// The resolved output for one suggestion.
#[derive(Debug, Clone)]
pub struct CodeArtifact {
    pub suggestion_id: String,
    pub code: String,
    pub framework: String,
    pub output_file_name: String,
    pub dependencies: Vec<String>,
}

pub fn resolve(suggestion: &SuggestionDescriptor) -> CodeArtifact {
    let scaffold = template_for(&suggestion.framework);
    let code = scaffold
        .replace("__TITLE__", &suggestion.title)
        .replace("__TITLE_COMPACT__", &compact(&suggestion.title));

    CodeArtifact {
        suggestion_id: suggestion.id.clone(),
        code,
        framework: suggestion.framework.clone(),
        output_file_name: output_file_name(&suggestion.title, &suggestion.framework),
        dependencies: dependencies_for(&suggestion.framework)
            .iter()
            .map(|d| d.to_string())
            .collect(),
    }
}

/// Strip everything non-alphanumeric from the title, then append the
/// framework's extension (`.test.js` when the framework has none).
pub fn output_file_name(title: &str, framework: &str) -> String {
    let stem: String = title.chars().filter(char::is_ascii_alphanumeric).collect();

    let ext = match framework {
        "Jest" => ".test.js",
        "Supertest" => ".test.js",
        "React Testing Library" => ".test.jsx",
        "Selenium WebDriver" => ".py",
        "pytest" => ".py",
        _ => ".test.js",
    };

    format!("{stem}{ext}")
}

fn compact(title: &str) -> String {
    title.split_whitespace().collect()
}

fn dependencies_for(framework: &str) -> &'static [&'static str] {
    match framework {
        "Jest" => &[
            "@testing-library/react",
            "@testing-library/jest-dom",
            "@testing-library/user-event",
        ],
        "Supertest" => &["supertest", "jest"],
        "React Testing Library" => &[
            "@testing-library/react",
            "@testing-library/jest-dom",
            "@testing-library/user-event",
        ],
        "React Testing Library + jest-axe" => &[
            "@testing-library/react",
            "@testing-library/jest-dom",
            "@testing-library/user-event",
            "jest-axe",
        ],
        "Selenium WebDriver" => &["selenium", "webdriver-manager"],
        "Selenium WebDriver + pytest" => &["selenium", "webdriver-manager", "pytest"],
        "pytest" => &["pytest", "pytest-mock"],
        "pytest + pytest-benchmark" => &["pytest", "pytest-benchmark", "pytest-mock"],
        "pytest + memory-profiler" => &["pytest", "memory-profiler", "psutil", "pytest-mock"],
        "pytest + pytest-asyncio" => &["pytest", "pytest-asyncio", "pytest-mock"],
        "Jest + SQLite" => &["sqlite3", "jest"],
        "Jest + PostgreSQL" => &["pg", "jest"],
        "Jest + Supertest" => &["jest", "supertest"],
        _ => &[],
    }
}

/* ============================================================
   Scaffolds
   ============================================================ */

fn template_for(framework: &str) -> &'static str {
    match framework {
        "Supertest" => SUPERTEST,
        "React Testing Library" => REACT_TESTING_LIBRARY,
        "React Testing Library + jest-axe" => JEST_AXE,
        "pytest" => PYTEST,
        "pytest + pytest-benchmark" => PYTEST_BENCHMARK,
        "pytest + memory-profiler" => PYTEST_MEMORY,
        "pytest + pytest-asyncio" => PYTEST_ASYNCIO,
        "Jest + SQLite" => JEST_SQLITE,
        "Jest + PostgreSQL" => JEST_POSTGRES,
        "Selenium WebDriver" => SELENIUM,
        // Jest and every unrecognized tag
        _ => JEST,
    }
}

const JEST: &str = r#"import { render, screen, fireEvent } from '@testing-library/react';
import '@testing-library/jest-dom';

describe('__TITLE__', () => {
  test('should render without crashing', () => {
    render(<div>Test Component</div>);
    expect(screen.getByText('Test Component')).toBeInTheDocument();
  });

  test('should handle user interaction', async () => {
    render(<button>Submit</button>);
    fireEvent.click(screen.getByRole('button', { name: /submit/i }));
    expect(screen.getByRole('button')).toBeEnabled();
  });

  test('should surface error states', async () => {
    render(<div role="alert">Something went wrong</div>);
    expect(screen.getByRole('alert')).toHaveTextContent('Something went wrong');
  });
});
"#;

const SUPERTEST: &str = r#"const request = require('supertest');
const app = require('../src/app');

describe('__TITLE__', () => {
  describe('GET /api/users', () => {
    it('should return list of users', async () => {
      const response = await request(app).get('/api/users').expect(200);
      expect(response.body).toBeInstanceOf(Array);
    });

    it('should reject an invalid token', async () => {
      const response = await request(app)
        .get('/api/users')
        .set('Authorization', 'Bearer invalid-token')
        .expect(401);
      expect(response.body.error).toBe('Unauthorized');
    });
  });

  describe('POST /api/users', () => {
    it('should create a new user', async () => {
      const userData = { name: 'Test User', email: 'test@example.com' };
      const response = await request(app).post('/api/users').send(userData).expect(201);
      expect(response.body.email).toBe(userData.email);
    });
  });
});
"#;

const REACT_TESTING_LIBRARY: &str = r#"import React from 'react';
import { render, screen, fireEvent, waitFor } from '@testing-library/react';
import userEvent from '@testing-library/user-event';
import '@testing-library/jest-dom';

describe('__TITLE__', () => {
  test('renders button with correct text', () => {
    render(<button>Click me</button>);
    expect(screen.getByRole('button', { name: /click me/i })).toBeInTheDocument();
  });

  test('calls onClick handler when clicked', () => {
    const handleClick = jest.fn();
    render(<button onClick={handleClick}>Click me</button>);
    fireEvent.click(screen.getByRole('button'));
    expect(handleClick).toHaveBeenCalledTimes(1);
  });

  test('submits form with typed data', async () => {
    const handleSubmit = jest.fn();
    const user = userEvent.setup();
    render(<form onSubmit={handleSubmit}><input aria-label="email" /></form>);
    await user.type(screen.getByLabelText(/email/i), 'test@example.com');
    await waitFor(() => {
      expect(screen.getByLabelText(/email/i)).toHaveValue('test@example.com');
    });
  });
});
"#;

const JEST_AXE: &str = r#"import React from 'react';
import { render, screen } from '@testing-library/react';
import { axe, toHaveNoViolations } from 'jest-axe';
import '@testing-library/jest-dom';

expect.extend(toHaveNoViolations);

describe('__TITLE__', () => {
  test('component should have no accessibility violations', async () => {
    const { container } = render(<button>Click me</button>);
    const results = await axe(container);
    expect(results).toHaveNoViolations();
  });

  test('controls expose proper ARIA labels', () => {
    render(<button aria-label="Submit form">Click me</button>);
    expect(screen.getByRole('button', { name: /submit form/i })).toBeInTheDocument();
  });
});
"#;

const PYTEST: &str = r#"import pytest


class TestSuite:
    """__TITLE__"""

    def test_validates_well_formed_input(self):
        assert validate("test@example.com") is True

    def test_rejects_malformed_input(self):
        assert validate("not-an-email") is False

    def test_raises_on_empty_data(self):
        with pytest.raises(ValueError, match="No data loaded"):
            process([])


if __name__ == "__main__":
    pytest.main([__file__])
"#;

const PYTEST_BENCHMARK: &str = r#"import pytest


class TestPerformance:
    """__TITLE__"""

    def test_large_dataset_processing(self, benchmark):
        data = [{"id": i, "value": i * 2} for i in range(10000)]
        result = benchmark(lambda: summarize(data))
        assert result["count"] == 10000

    def test_grouping_throughput(self, benchmark):
        data = [{"id": i, "bucket": i % 7} for i in range(50000)]
        result = benchmark(lambda: group_by(data, "bucket"))
        assert len(result) == 7


if __name__ == "__main__":
    pytest.main([__file__, "--benchmark-only"])
"#;

const PYTEST_MEMORY: &str = r#"import os

import psutil
import pytest


class TestMemory:
    """__TITLE__"""

    def setup_method(self):
        self.process = psutil.Process(os.getpid())

    def test_memory_stays_bounded_during_processing(self):
        before = self.process.memory_info().rss / 1024 / 1024
        summarize([{"id": i, "value": i} for i in range(100000)])
        after = self.process.memory_info().rss / 1024 / 1024
        assert after - before < 100

    def test_memory_released_after_clearing(self):
        before = self.process.memory_info().rss / 1024 / 1024
        data = [{"id": i} for i in range(50000)]
        data.clear()
        after = self.process.memory_info().rss / 1024 / 1024
        assert abs(after - before) < 10


if __name__ == "__main__":
    pytest.main([__file__])
"#;

const PYTEST_ASYNCIO: &str = r#"import asyncio

import pytest


class TestAsync:
    """__TITLE__"""

    @pytest.mark.asyncio
    async def test_async_load(self):
        result = await load_async("test.json")
        assert result is not None

    @pytest.mark.asyncio
    async def test_concurrent_processing(self):
        results = await asyncio.gather(*(process_async(i) for i in range(3)))
        assert len(results) == 3


if __name__ == "__main__":
    pytest.main([__file__, "--asyncio-mode=auto"])
"#;

const JEST_SQLITE: &str = r#"const sqlite3 = require('sqlite3').verbose();
const path = require('path');

describe('__TITLE__', () => {
  let db;

  beforeAll(() => {
    db = new sqlite3.Database(path.join(__dirname, 'test.db'));
    db.run(`CREATE TABLE IF NOT EXISTS users (
      id INTEGER PRIMARY KEY,
      email TEXT UNIQUE NOT NULL
    )`);
  });

  afterAll((done) => {
    db.close(done);
  });

  test('should create a new row', (done) => {
    db.run('INSERT INTO users (email) VALUES (?)', ['test@example.com'], function (err) {
      expect(err).toBeNull();
      expect(this.lastID).toBeGreaterThan(0);
      done();
    });
  });

  test('should reject duplicate email', (done) => {
    db.run('INSERT INTO users (email) VALUES (?)', ['test@example.com'], (err) => {
      expect(err).not.toBeNull();
      expect(err.message).toContain('UNIQUE constraint failed');
      done();
    });
  });
});
"#;

const JEST_POSTGRES: &str = r#"const { Pool } = require('pg');

describe('__TITLE__', () => {
  let pool;

  beforeAll(() => {
    pool = new Pool({
      host: process.env.DB_HOST || 'localhost',
      database: process.env.DB_NAME || 'test_db',
    });
  });

  afterAll(async () => {
    await pool.end();
  });

  test('should handle transactions correctly', async () => {
    const client = await pool.connect();
    try {
      await client.query('BEGIN');
      const res = await client.query(
        'INSERT INTO users (email) VALUES ($1) RETURNING id',
        ['test@example.com']
      );
      await client.query('COMMIT');
      expect(res.rows[0].id).toBeGreaterThan(0);
    } catch (error) {
      await client.query('ROLLBACK');
      throw error;
    } finally {
      client.release();
    }
  });
});
"#;

const SELENIUM: &str = r#"import unittest

from selenium import webdriver
from selenium.webdriver.chrome.options import Options
from selenium.webdriver.common.by import By
from selenium.webdriver.support import expected_conditions as EC
from selenium.webdriver.support.ui import WebDriverWait


class __TITLE_COMPACT__Test(unittest.TestCase):
    def setUp(self):
        options = Options()
        options.add_argument("--headless")
        self.driver = webdriver.Chrome(options=options)
        self.wait = WebDriverWait(self.driver, 10)

    def tearDown(self):
        self.driver.quit()

    def test_homepage_loads(self):
        self.driver.get("http://localhost:3000")
        main = self.wait.until(EC.presence_of_element_located((By.TAG_NAME, "main")))
        self.assertTrue(main.is_displayed())

    def test_user_login(self):
        self.driver.get("http://localhost:3000/login")
        self.driver.find_element(By.NAME, "email").send_keys("test@example.com")
        self.driver.find_element(By.NAME, "password").send_keys("password123")
        self.driver.find_element(By.XPATH, "//button[@type='submit']").click()
        self.wait.until(EC.url_contains("/dashboard"))


if __name__ == "__main__":
    unittest.main()
"#;

/* ============================================================
   Tests
   ============================================================ */

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testgen::suggestion::Complexity;

    fn suggestion(title: &str, framework: &str) -> SuggestionDescriptor {
        SuggestionDescriptor {
            id: "js-unit-1".to_string(),
            title: title.to_string(),
            description: String::new(),
            framework: framework.to_string(),
            files: vec!["auth.js".to_string()],
            estimated_effort: "1-2 hours".to_string(),
            complexity: Complexity::Low,
        }
    }

    #[test]
    fn jest_unit_title_derives_the_expected_file_name() {
        let artifact = resolve(&suggestion("JavaScript Unit Tests", "Jest"));
        assert_eq!(artifact.output_file_name, "JavaScriptUnitTests.test.js");
        assert_eq!(artifact.framework, "Jest");
        assert_eq!(artifact.suggestion_id, "js-unit-1");
        assert!(artifact.code.contains("describe('JavaScript Unit Tests'"));
    }

    #[test]
    fn unknown_framework_never_fails() {
        let artifact = resolve(&suggestion("Mystery Tests", "made-up-framework"));
        assert!(artifact.code.contains("describe('Mystery Tests'"));
        assert!(artifact.dependencies.is_empty());
        assert_eq!(artifact.output_file_name, "MysteryTests.test.js");
    }

    #[test]
    fn selenium_resolves_to_python_with_compact_class_name() {
        let artifact = resolve(&suggestion("Selenium E2E Tests", "Selenium WebDriver"));
        assert_eq!(artifact.output_file_name, "SeleniumE2ETests.py");
        assert!(artifact.code.contains("class SeleniumE2ETestsTest(unittest.TestCase)"));
        assert_eq!(artifact.dependencies, ["selenium", "webdriver-manager"]);
    }

    #[test]
    fn extension_table_covers_only_the_known_five() {
        assert_eq!(output_file_name("A B", "pytest"), "AB.py");
        assert_eq!(output_file_name("A B", "React Testing Library"), "AB.test.jsx");
        // frameworks outside the table fall back to .test.js
        assert_eq!(output_file_name("A B", "pytest + pytest-benchmark"), "AB.test.js");
    }

    #[test]
    fn dependency_table_matches_framework_tags_exactly() {
        let artifact = resolve(&suggestion("API Security Tests", "Jest + Supertest"));
        assert_eq!(artifact.dependencies, ["jest", "supertest"]);

        let pytest = resolve(&suggestion("Python Unit Tests", "pytest"));
        assert_eq!(pytest.dependencies, ["pytest", "pytest-mock"]);
    }
}
